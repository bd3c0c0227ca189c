use crate::semantics::SemanticModel;
use crate::syntax::{Expr, Span, Stmt};
use crate::utils::LineIndex;
use serde::Serialize;
use std::path::PathBuf;

/// Context passed to rules during a walk over one source unit.
pub struct Context<'a> {
    /// Path of the source unit being analyzed, as reported by the host.
    pub filename: PathBuf,
    /// Line index for accurate line/column mapping.
    pub line_index: LineIndex,
    /// The host's type-query capability for this unit.
    pub semantics: &'a dyn SemanticModel,
}

/// Diagnostic severity, fixed per rule at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Non-blocking diagnostic.
    Warning,
    /// Blocking diagnostic.
    Error,
}

/// A single issue found by a rule, forwarded to the host's diagnostic channel.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// ID of the rule that triggered the finding.
    pub rule_id: String,
    /// Category of the rule.
    pub category: String,
    /// Severity level.
    pub severity: Severity,
    /// Description of the issue.
    pub message: String,
    /// File where the issue was found.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
    /// Location token the host stores with the diagnostic and hands back
    /// on a fix request.
    pub span: Span,
}

#[derive(Debug, Clone, Copy, Serialize)]
/// Metadata associated with a rule.
pub struct RuleMetadata {
    /// Unique code/ID of the rule.
    pub id: &'static str,
    /// Category of the rule.
    pub category: &'static str,
}

/// Trait defining an analysis rule.
pub trait Rule: Send + Sync {
    /// Returns the descriptive name of the rule.
    fn name(&self) -> &'static str;
    /// Returns the unique code/ID of the rule.
    fn code(&self) -> &'static str {
        self.metadata().id
    }
    /// Returns the category/functional group of the rule.
    fn category(&self) -> &'static str {
        self.metadata().category
    }
    /// Returns the full metadata for the rule.
    fn metadata(&self) -> RuleMetadata;
    /// Called when entering a statement.
    fn enter_stmt(&mut self, _stmt: &Stmt, _context: &Context<'_>) -> Option<Vec<Finding>> {
        None
    }
    /// Called when visiting an expression.
    fn visit_expr(&mut self, _expr: &Expr, _context: &Context<'_>) -> Option<Vec<Finding>> {
        None
    }
}

/// Module containing rule ID constants.
pub mod ids;
/// Module containing readability rules.
pub mod readability;
