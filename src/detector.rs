//! Detection walk over one source unit.
//!
//! The host invokes this once per semantic-analysis cycle. The walk is a
//! single depth-first pass, visits every member-access expression exactly
//! once, never mutates the tree, and keeps no state between invocations, so
//! the host may run it concurrently over disjoint trees.

use crate::rules::{Context, Finding, Rule};
use crate::semantics::SemanticModel;
use crate::syntax::{Expr, SourceUnit, Stmt};
use crate::utils::LineIndex;
use std::path::PathBuf;

/// Visitor for traversing a source unit and applying rules.
pub struct DetectorVisitor<'a> {
    rules: Vec<Box<dyn Rule>>,
    context: Context<'a>,
    /// List of findings collected during the traversal.
    pub findings: Vec<Finding>,
}

impl<'a> DetectorVisitor<'a> {
    /// Creates a new `DetectorVisitor` with the given rules and context.
    #[must_use]
    pub fn new(
        rules: Vec<Box<dyn Rule>>,
        filename: PathBuf,
        line_index: LineIndex,
        semantics: &'a dyn SemanticModel,
    ) -> Self {
        Self {
            rules,
            context: Context {
                filename,
                line_index,
                semantics,
            },
            findings: Vec::new(),
        }
    }

    /// Visits a statement node and applies rules.
    pub fn visit_stmt(&mut self, stmt: &Stmt) {
        for rule in &mut self.rules {
            if let Some(mut findings) = rule.enter_stmt(stmt, &self.context) {
                self.findings.append(&mut findings);
            }
        }

        // Manually walk children
        match stmt {
            Stmt::LocalDecl { init, .. } => {
                if let Some(init) = init {
                    self.visit_expr(init);
                }
            }
            Stmt::If {
                cond,
                then_body,
                else_body,
                ..
            } => {
                self.visit_expr(cond);
                for s in then_body {
                    self.visit_stmt(s);
                }
                for s in else_body {
                    self.visit_stmt(s);
                }
            }
            Stmt::While { cond, body, .. } => {
                self.visit_expr(cond);
                for s in body {
                    self.visit_stmt(s);
                }
            }
            Stmt::Assign { value, .. } => self.visit_expr(value),
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.visit_expr(value);
                }
            }
            Stmt::Expr { expr, .. } => self.visit_expr(expr),
        }
    }

    /// Visits an expression node and applies rules.
    ///
    /// Recurses into every sub-expression so rules see member accesses at
    /// any nesting depth exactly once.
    pub fn visit_expr(&mut self, expr: &Expr) {
        for rule in &mut self.rules {
            if let Some(mut findings) = rule.visit_expr(expr, &self.context) {
                self.findings.append(&mut findings);
            }
        }

        // Recursively visit sub-expressions
        match expr {
            Expr::MemberAccess { receiver, .. } => self.visit_expr(receiver),
            Expr::Invocation { callee, args, .. } => {
                self.visit_expr(callee);
                for arg in args {
                    self.visit_expr(arg);
                }
            }
            Expr::Binary { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::Unary { operand, .. } => self.visit_expr(operand),
            Expr::Parenthesized { inner, .. } => self.visit_expr(inner),
            Expr::Identifier { .. } | Expr::Literal { .. } => {}
        }
    }
}

/// Runs the given rules over one source unit and returns the findings.
///
/// This is the plain detection entry point the registry exposes to the host:
/// one depth-first pass, findings in traversal order.
#[must_use]
pub fn run_rules(
    unit: &SourceUnit,
    rules: Vec<Box<dyn Rule>>,
    filename: PathBuf,
    line_index: LineIndex,
    semantics: &dyn SemanticModel,
) -> Vec<Finding> {
    let mut visitor = DetectorVisitor::new(rules, filename, line_index, semantics);
    for stmt in &unit.body {
        visitor.visit_stmt(stmt);
    }
    visitor.findings
}
