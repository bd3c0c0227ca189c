//! Structural rewriter for the `HasValue` null-check fix.
//!
//! Re-acquisition: the recorded span may point at an inner token (the
//! member-name identifier rather than the whole access), so the rewriter
//! locates the innermost member-access expression whose span contains the
//! location. Construction reuses the located node's receiver subtree
//! unmodified and wraps it in a `!= null` comparison. Substitution returns
//! a new tree; the input is never mutated.

use crate::syntax::{BinaryOp, Expr, Literal, SourceUnit, Span, Stmt};
use thiserror::Error;

/// Error produced when a fix request cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FixError {
    /// The recorded location no longer encloses a member-access expression.
    /// The caller's stored diagnostic is inconsistent with the current tree.
    #[error("no member-access expression encloses {span}")]
    NoMemberAccess {
        /// The location that failed to resolve.
        span: Span,
    },
}

/// Produces a new unit in which the member access enclosing `location` is
/// replaced by a `!= null` comparison against its receiver.
///
/// Exactly one node is replaced per call. The receiver sub-expression is
/// reused as-is; all unaffected statements are structural clones of the
/// input.
///
/// # Errors
///
/// Returns [`FixError::NoMemberAccess`] when no member-access expression in
/// the unit encloses `location` — the rewrite fails loudly instead of
/// silently returning an unchanged tree.
pub fn rewrite_at(unit: &SourceUnit, location: Span) -> Result<SourceUnit, FixError> {
    let mut replaced = false;
    let body = unit
        .body
        .iter()
        .map(|stmt| rewrite_stmt(stmt, location, &mut replaced))
        .collect();
    if replaced {
        Ok(SourceUnit { body })
    } else {
        Err(FixError::NoMemberAccess { span: location })
    }
}

fn rewrite_stmt(stmt: &Stmt, location: Span, replaced: &mut bool) -> Stmt {
    if *replaced {
        return stmt.clone();
    }
    match stmt {
        Stmt::LocalDecl {
            ty,
            name,
            init,
            span,
        } => Stmt::LocalDecl {
            ty: ty.clone(),
            name: name.clone(),
            init: init
                .as_ref()
                .map(|init| rewrite_expr(init, location, replaced)),
            span: *span,
        },
        Stmt::If {
            cond,
            then_body,
            else_body,
            span,
        } => Stmt::If {
            cond: rewrite_expr(cond, location, replaced),
            then_body: then_body
                .iter()
                .map(|s| rewrite_stmt(s, location, replaced))
                .collect(),
            else_body: else_body
                .iter()
                .map(|s| rewrite_stmt(s, location, replaced))
                .collect(),
            span: *span,
        },
        Stmt::While { cond, body, span } => Stmt::While {
            cond: rewrite_expr(cond, location, replaced),
            body: body
                .iter()
                .map(|s| rewrite_stmt(s, location, replaced))
                .collect(),
            span: *span,
        },
        Stmt::Assign {
            target,
            value,
            span,
        } => Stmt::Assign {
            target: target.clone(),
            value: rewrite_expr(value, location, replaced),
            span: *span,
        },
        Stmt::Return { value, span } => Stmt::Return {
            value: value
                .as_ref()
                .map(|value| rewrite_expr(value, location, replaced)),
            span: *span,
        },
        Stmt::Expr { expr, span } => Stmt::Expr {
            expr: rewrite_expr(expr, location, replaced),
            span: *span,
        },
    }
}

fn rewrite_expr(expr: &Expr, location: Span, replaced: &mut bool) -> Expr {
    if *replaced {
        return expr.clone();
    }
    match expr {
        Expr::MemberAccess {
            receiver,
            member,
            member_span,
            span,
        } => {
            // A member access nested in the receiver is closer to the
            // recorded token; prefer it.
            let new_receiver = rewrite_expr(receiver, location, replaced);
            if *replaced {
                return Expr::MemberAccess {
                    receiver: Box::new(new_receiver),
                    member: member.clone(),
                    member_span: *member_span,
                    span: *span,
                };
            }
            if span.contains(location) {
                *replaced = true;
                return not_null_comparison(receiver, *span);
            }
            expr.clone()
        }
        Expr::Invocation { callee, args, span } => Expr::Invocation {
            callee: Box::new(rewrite_expr(callee, location, replaced)),
            args: args
                .iter()
                .map(|arg| rewrite_expr(arg, location, replaced))
                .collect(),
            span: *span,
        },
        Expr::Binary {
            op,
            left,
            right,
            span,
        } => Expr::Binary {
            op: *op,
            left: Box::new(rewrite_expr(left, location, replaced)),
            right: Box::new(rewrite_expr(right, location, replaced)),
            span: *span,
        },
        Expr::Unary { op, operand, span } => Expr::Unary {
            op: *op,
            operand: Box::new(rewrite_expr(operand, location, replaced)),
            span: *span,
        },
        Expr::Parenthesized { inner, span } => Expr::Parenthesized {
            inner: Box::new(rewrite_expr(inner, location, replaced)),
            span: *span,
        },
        Expr::Identifier { .. } | Expr::Literal { .. } => expr.clone(),
    }
}

/// Builds `receiver != null`, reusing the receiver subtree as-is.
///
/// The comparison takes over the replaced node's span so later diagnostics
/// in the same unit keep their recorded locations valid.
fn not_null_comparison(receiver: &Expr, span: Span) -> Expr {
    Expr::Binary {
        op: BinaryOp::NotEq,
        left: Box::new(receiver.clone()),
        right: Box::new(Expr::Literal {
            value: Literal::Null,
            span: Span::new(span.end, span.end),
        }),
        span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::parse_unit;

    fn span_of(source: &str, needle: &str) -> Span {
        let start = source.find(needle).expect("needle present");
        Span::new(start, start + needle.len())
    }

    #[test]
    fn test_rewrites_simple_condition() {
        let source = "if (a.HasValue) { }";
        let unit = parse_unit(source).expect("fixture parses");

        let fixed = rewrite_at(&unit, span_of(source, "a.HasValue")).expect("fix applies");
        assert_eq!(fixed.to_string(), "if (a != null) { }");
    }

    #[test]
    fn test_location_may_point_at_member_token() {
        let source = "if (a.HasValue) { }";
        let unit = parse_unit(source).expect("fixture parses");

        // Span of the accessed name alone, not the whole access.
        let fixed = rewrite_at(&unit, span_of(source, "HasValue")).expect("fix applies");
        assert_eq!(fixed.to_string(), "if (a != null) { }");
    }

    #[test]
    fn test_receiver_subtree_is_reused() {
        let source = "if (box.inner.HasValue) { }";
        let unit = parse_unit(source).expect("fixture parses");

        let original_receiver = match &unit.body[0] {
            Stmt::If { cond, .. } => match cond {
                Expr::MemberAccess { receiver, .. } => (**receiver).clone(),
                other => panic!("expected member access, got {other:?}"),
            },
            other => panic!("expected if, got {other:?}"),
        };

        let fixed = rewrite_at(&unit, span_of(source, "box.inner.HasValue")).expect("fix applies");
        match &fixed.body[0] {
            Stmt::If { cond, .. } => match cond {
                Expr::Binary { op, left, right, .. } => {
                    assert_eq!(*op, BinaryOp::NotEq);
                    assert_eq!(**left, original_receiver);
                    assert!(matches!(
                        **right,
                        Expr::Literal {
                            value: Literal::Null,
                            ..
                        }
                    ));
                }
                other => panic!("expected comparison, got {other:?}"),
            },
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_replaces_exactly_one_node() {
        let source = "if (a.HasValue) { } if (b.HasValue) { }";
        let unit = parse_unit(source).expect("fixture parses");

        let fixed = rewrite_at(&unit, span_of(source, "a.HasValue")).expect("fix applies");
        assert_eq!(fixed.to_string(), "if (a != null) { } if (b.HasValue) { }");
    }

    #[test]
    fn test_unrelated_location_fails_loudly() {
        let source = "if (a.HasValue) { }";
        let unit = parse_unit(source).expect("fixture parses");

        let location = span_of(source, "if");
        let err = rewrite_at(&unit, location).expect_err("no member access there");
        assert_eq!(err, FixError::NoMemberAccess { span: location });
    }

    #[test]
    fn test_error_display_names_the_span() {
        let err = FixError::NoMemberAccess {
            span: Span::new(4, 14),
        };
        assert_eq!(
            err.to_string(),
            "no member-access expression encloses 4..14"
        );
    }
}
