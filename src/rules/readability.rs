use crate::constants::{CATEGORY_READABILITY, HAS_VALUE_MEMBER, NULLABLE_TYPE_NAME};
use crate::rules::{ids, Context, Finding, Rule, RuleMetadata, Severity};
use crate::syntax::Expr;

/// Returns the readability rule set.
#[must_use]
pub fn get_readability_rules() -> Vec<Box<dyn Rule>> {
    vec![Box::new(NullableHasValueRule)]
}

/// Flags member accesses `expr.HasValue` where `expr` is statically typed
/// as the nullable wrapper, so the check can be rewritten to `expr != null`
/// and read uniformly with reference-type null checks.
///
/// The predicate compares the resolved type's simple name against
/// `Nullable`; an unrelated user-defined type with that exact simple name
/// would also match. The host boundary exposes name-comparable descriptors
/// only, so a structural check is not available here.
pub struct NullableHasValueRule;

impl Rule for NullableHasValueRule {
    fn name(&self) -> &'static str {
        "NullableHasValueRule"
    }

    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            id: ids::RULE_ID_NULLABLE_HAS_VALUE,
            category: CATEGORY_READABILITY,
        }
    }

    fn visit_expr(&mut self, expr: &Expr, context: &Context<'_>) -> Option<Vec<Finding>> {
        let Expr::MemberAccess {
            receiver,
            member,
            span,
            ..
        } = expr
        else {
            return None;
        };

        // An unresolvable receiver type is "no match", not an error.
        let ty = context.semantics.type_of(receiver)?;
        if ty.name.as_str() != NULLABLE_TYPE_NAME {
            return None;
        }
        if member.as_str() != HAS_VALUE_MEMBER {
            return None;
        }

        let (line, col) = context.line_index.line_col(span.start);
        Some(vec![Finding {
            rule_id: ids::RULE_ID_NULLABLE_HAS_VALUE.to_owned(),
            category: CATEGORY_READABILITY.to_owned(),
            severity: Severity::Warning,
            message: format!("The variable '{member}' is checked for null with HasValue."),
            file: context.filename.clone(),
            line,
            col,
            span: *span,
        }])
    }
}
