//! Host-boundary syntax tree representation.
//!
//! The host parses source units; this crate only consumes the resulting
//! tree. Nodes are a tagged-variant enum rather than a class hierarchy, and
//! every node carries the byte span the host assigned to it. Trees are
//! immutable: the fix rewriter produces a new tree instead of mutating a
//! shared one.

use compact_str::CompactString;
use serde::Serialize;
use std::fmt;

/// Byte-offset span of a node in the original source unit.
///
/// Spans are opaque location tokens to the rule set: a finding records one,
/// the host stores it with the diagnostic, and a later fix request hands it
/// back. The only structure the rewriter relies on is containment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True if the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True if `other` lies entirely within this span.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Binary operators the rule set needs to inspect or construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::And => "&&",
            Self::Or => "||",
        };
        f.write_str(text)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!`
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Not => f.write_str("!"),
        }
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// The absence literal `null`.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// String literal (content without quotes).
    Str(CompactString),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str(crate::constants::NULL_LITERAL_TEXT),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "\"{value}\""),
        }
    }
}

/// One expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A bare identifier reference.
    Identifier {
        /// Referenced name.
        name: CompactString,
        /// Node span.
        span: Span,
    },
    /// `receiver.member`
    MemberAccess {
        /// Receiver sub-expression to the left of the dot.
        receiver: Box<Expr>,
        /// Accessed member name.
        member: CompactString,
        /// Span of the member-name token alone.
        member_span: Span,
        /// Span of the whole access, receiver included.
        span: Span,
    },
    /// `callee(args...)`
    Invocation {
        /// The invoked expression.
        callee: Box<Expr>,
        /// Argument expressions in source order.
        args: Vec<Expr>,
        /// Node span.
        span: Span,
    },
    /// `left op right`
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
        /// Node span.
        span: Span,
    },
    /// `op operand`
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
        /// Node span.
        span: Span,
    },
    /// A literal value.
    Literal {
        /// The value.
        value: Literal,
        /// Node span.
        span: Span,
    },
    /// `(inner)`
    Parenthesized {
        /// The wrapped expression.
        inner: Box<Expr>,
        /// Node span, parentheses included.
        span: Span,
    },
}

impl Expr {
    /// Span of this node.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Identifier { span, .. }
            | Self::MemberAccess { span, .. }
            | Self::Invocation { span, .. }
            | Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::Literal { span, .. }
            | Self::Parenthesized { span, .. } => *span,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier { name, .. } => f.write_str(name),
            Self::MemberAccess {
                receiver, member, ..
            } => write!(f, "{receiver}.{member}"),
            Self::Invocation { callee, args, .. } => {
                write!(f, "{callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Self::Binary {
                op, left, right, ..
            } => write!(f, "{left} {op} {right}"),
            Self::Unary { op, operand, .. } => write!(f, "{op}{operand}"),
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::Parenthesized { inner, .. } => write!(f, "({inner})"),
        }
    }
}

/// A declared type as written at a declaration site, e.g. `int?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    /// The written type name without the nullable marker.
    pub name: CompactString,
    /// Whether the `?` nullable marker was present.
    pub nullable: bool,
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// One statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `ty name;` or `ty name = init;`
    LocalDecl {
        /// Declared type as written.
        ty: TypeName,
        /// Declared variable name.
        name: CompactString,
        /// Optional initializer.
        init: Option<Expr>,
        /// Node span.
        span: Span,
    },
    /// `if (cond) { ... } else { ... }`
    If {
        /// Condition expression.
        cond: Expr,
        /// Then-branch body.
        then_body: Vec<Stmt>,
        /// Else-branch body (empty when no `else` clause).
        else_body: Vec<Stmt>,
        /// Node span.
        span: Span,
    },
    /// `while (cond) { ... }`
    While {
        /// Condition expression.
        cond: Expr,
        /// Loop body.
        body: Vec<Stmt>,
        /// Node span.
        span: Span,
    },
    /// `target = value;`
    Assign {
        /// Assigned variable name.
        target: CompactString,
        /// Assigned value.
        value: Expr,
        /// Node span.
        span: Span,
    },
    /// `return;` or `return value;`
    Return {
        /// Optional returned value.
        value: Option<Expr>,
        /// Node span.
        span: Span,
    },
    /// An expression in statement position.
    Expr {
        /// The expression.
        expr: Expr,
        /// Node span, trailing semicolon included.
        span: Span,
    },
}

impl Stmt {
    /// Span of this node.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::LocalDecl { span, .. }
            | Self::If { span, .. }
            | Self::While { span, .. }
            | Self::Assign { span, .. }
            | Self::Return { span, .. }
            | Self::Expr { span, .. } => *span,
        }
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, body: &[Stmt]) -> fmt::Result {
    if body.is_empty() {
        return f.write_str("{ }");
    }
    f.write_str("{ ")?;
    for stmt in body {
        write!(f, "{stmt} ")?;
    }
    f.write_str("}")
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalDecl { ty, name, init, .. } => match init {
                Some(init) => write!(f, "{ty} {name} = {init};"),
                None => write!(f, "{ty} {name};"),
            },
            Self::If {
                cond,
                then_body,
                else_body,
                ..
            } => {
                write!(f, "if ({cond}) ")?;
                write_block(f, then_body)?;
                if else_body.is_empty() {
                    Ok(())
                } else {
                    f.write_str(" else ")?;
                    write_block(f, else_body)
                }
            }
            Self::While { cond, body, .. } => {
                write!(f, "while ({cond}) ")?;
                write_block(f, body)
            }
            Self::Assign { target, value, .. } => write!(f, "{target} = {value};"),
            Self::Return { value, .. } => match value {
                Some(value) => write!(f, "return {value};"),
                None => f.write_str("return;"),
            },
            Self::Expr { expr, .. } => write!(f, "{expr};"),
        }
    }
}

/// A parsed source unit as supplied by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceUnit {
    /// Top-level statements in source order.
    pub body: Vec<Stmt>,
}

impl fmt::Display for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.body.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}
