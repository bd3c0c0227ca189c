//! Tests for the static rule table
#![allow(clippy::expect_used)]

use nullable_null_check::registry::{find_rule, RULES};
use nullable_null_check::rules::ids::RULE_ID_NULLABLE_HAS_VALUE;
use nullable_null_check::rules::Severity;
use nullable_null_check::test_utils::{parse_unit, type_table_for};
use nullable_null_check::utils::LineIndex;
use std::path::PathBuf;

#[test]
fn test_table_is_keyed_by_stable_id() {
    assert_eq!(RULES.len(), 1);
    assert!(find_rule(RULE_ID_NULLABLE_HAS_VALUE).is_some());
    assert!(find_rule("NNC-R999").is_none());
}

#[test]
fn test_rule_metadata_is_static() {
    let entry = find_rule(RULE_ID_NULLABLE_HAS_VALUE).expect("rule registered");
    assert_eq!(entry.id, "NNC-R001");
    assert_eq!(entry.category, "Readability");
    assert_eq!(entry.severity, Severity::Warning);
    assert_eq!(
        entry.title,
        "The Nullable null check is performed with HasValue."
    );
    assert!(entry.message_template.contains("{0}"));
    assert!(entry.supports_batch_fix);
}

#[test]
fn test_host_can_route_detect_and_fix_through_entry() {
    let entry = find_rule(RULE_ID_NULLABLE_HAS_VALUE).expect("rule registered");

    let source = "int? a;\nif (a.HasValue) { }";
    let unit = parse_unit(source).expect("fixture parses");
    let table = type_table_for(&unit);

    let findings = (entry.detect)(
        &unit,
        PathBuf::from("test.cs"),
        LineIndex::new(source),
        &table,
    );
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule_id, entry.id);

    let fixed = (entry.fix)(&unit, findings[0].span).expect("fix applies");
    assert_eq!(fixed.body[1].to_string(), "if (a != null) { }");
}
