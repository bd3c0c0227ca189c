//! Static rule table exposed to the host.
//!
//! No reflection-style discovery: every rule this crate ships is an entry
//! in [`RULES`], keyed by its stable ID, with plain function pointers for
//! detection and fix. The host routes "fix this diagnostic" requests by
//! looking up the diagnostic's rule ID here.

use crate::constants::CATEGORY_READABILITY;
use crate::detector::run_rules;
use crate::fix::{self, FixError};
use crate::rules::readability::get_readability_rules;
use crate::rules::{ids, Finding, Severity};
use crate::semantics::SemanticModel;
use crate::syntax::{SourceUnit, Span};
use crate::utils::LineIndex;
use std::path::PathBuf;

/// Detection entry point: one pass over the unit, findings returned.
pub type DetectFn =
    fn(&SourceUnit, PathBuf, LineIndex, &dyn SemanticModel) -> Vec<Finding>;

/// Fix entry point: tree plus recorded location, new tree returned.
pub type FixFn = fn(&SourceUnit, Span) -> Result<SourceUnit, FixError>;

/// One statically registered rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleEntry {
    /// Stable rule ID the host stores on diagnostics.
    pub id: &'static str,
    /// Human-readable rule title.
    pub title: &'static str,
    /// Longer description of why the rule exists.
    pub description: &'static str,
    /// Message template with one substitution parameter, the accessed
    /// member's display name.
    pub message_template: &'static str,
    /// Category label.
    pub category: &'static str,
    /// Fixed severity.
    pub severity: Severity,
    /// Whether the host's generic sequential batch-fix mode may reapply the
    /// fix; no custom batching logic is supplied.
    pub supports_batch_fix: bool,
    /// Detection callback.
    pub detect: DetectFn,
    /// Fix callback.
    pub fix: FixFn,
}

fn detect_nullable_has_value(
    unit: &SourceUnit,
    filename: PathBuf,
    line_index: LineIndex,
    semantics: &dyn SemanticModel,
) -> Vec<Finding> {
    run_rules(unit, get_readability_rules(), filename, line_index, semantics)
}

/// The statically built rule table.
pub static RULES: &[RuleEntry] = &[RuleEntry {
    id: ids::RULE_ID_NULLABLE_HAS_VALUE,
    title: "The Nullable null check is performed with HasValue.",
    description: "Null checks for Nullable types should be performed with != null. \
                  Making it uniform to reference types and improving readability.",
    message_template: "The variable '{0}' is checked for null with HasValue.",
    category: CATEGORY_READABILITY,
    severity: Severity::Warning,
    supports_batch_fix: true,
    detect: detect_nullable_has_value,
    fix: fix::rewrite_at,
}];

/// Looks up a rule entry by its stable ID.
#[must_use]
pub fn find_rule(id: &str) -> Option<&'static RuleEntry> {
    RULES.iter().find(|entry| entry.id == id)
}
