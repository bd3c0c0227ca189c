//! Unit tests for the HasValue detection walk
//! Covers the match predicate, nesting, and skip conditions
#![allow(clippy::expect_used)]

use nullable_null_check::detector::run_rules;
use nullable_null_check::rules::ids::RULE_ID_NULLABLE_HAS_VALUE;
use nullable_null_check::rules::readability::get_readability_rules;
use nullable_null_check::rules::{Finding, Severity};
use nullable_null_check::test_utils::{parse_unit, type_table_for};
use nullable_null_check::utils::LineIndex;
use std::path::PathBuf;

fn detect(source: &str) -> Vec<Finding> {
    let unit = parse_unit(source).expect("fixture parses");
    let table = type_table_for(&unit);
    run_rules(
        &unit,
        get_readability_rules(),
        PathBuf::from("test.cs"),
        LineIndex::new(source),
        &table,
    )
}

#[test]
fn test_flags_hasvalue_on_nullable() {
    let source = "int? a;\nif (a.HasValue) { }";
    let findings = detect(source);

    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.rule_id, RULE_ID_NULLABLE_HAS_VALUE);
    assert_eq!(finding.severity, Severity::Warning);
    assert_eq!(finding.category, "Readability");
    assert_eq!(
        finding.message,
        "The variable 'HasValue' is checked for null with HasValue."
    );

    let start = source.find("a.HasValue").expect("occurrence present");
    assert_eq!(finding.span.start, start);
    assert_eq!(finding.span.end, start + "a.HasValue".len());
    assert_eq!(finding.line, 2);
    assert_eq!(finding.col, 5);
}

#[test]
fn test_ignores_unrelated_type_with_same_member() {
    // someObj exposes its own HasValue, but its type is not Nullable.
    let findings = detect("SomeObj someObj;\nbool b = someObj.HasValue;");
    assert!(findings.is_empty());
}

#[test]
fn test_ignores_other_members_on_nullable() {
    let findings = detect("int? a;\nint v = a.Value;\na.GetValueOrDefault();");
    assert!(findings.is_empty());
}

#[test]
fn test_unresolvable_receiver_type_is_skipped() {
    // `mystery` is never declared, so the semantic model cannot resolve it.
    let findings = detect("if (mystery.HasValue) { }");
    assert!(findings.is_empty());
}

#[test]
fn test_two_occurrences_in_one_condition() {
    let source = "int? a;\nint? b;\nif (a.HasValue && b.HasValue) { }";
    let findings = detect(source);

    assert_eq!(findings.len(), 2);
    assert_ne!(findings[0].span, findings[1].span);
}

#[test]
fn test_detects_inside_nested_expressions() {
    // Negation, parentheses, and argument position all reach the walker.
    let source = "int? a;\nif (!(a.HasValue)) { }\nLog(a.HasValue);";
    let findings = detect(source);
    assert_eq!(findings.len(), 2);
}

#[test]
fn test_detects_in_loop_and_return_positions() {
    let source = "int? a;\nwhile (a.HasValue) { a = Next(a); }\nreturn a.HasValue;";
    let findings = detect(source);
    assert_eq!(findings.len(), 2);
}

#[test]
fn test_each_occurrence_flagged_exactly_once() {
    let source = "int? a;\nbool b = a.HasValue == a.HasValue;";
    let findings = detect(source);

    // Two distinct nodes, one finding each, no duplicates per node.
    assert_eq!(findings.len(), 2);
    assert_ne!(findings[0].span, findings[1].span);
}

#[test]
fn test_detection_is_deterministic() {
    let source = "int? a;\nint? b;\nif (a.HasValue && b.HasValue) { }";
    let first: Vec<_> = detect(source).into_iter().map(|f| f.span).collect();
    let second: Vec<_> = detect(source).into_iter().map(|f| f.span).collect();
    assert_eq!(first, second);
}

#[test]
fn test_finding_serializes_for_diagnostic_channel() {
    let findings = detect("int? a;\nif (a.HasValue) { }");
    let json = serde_json::to_value(&findings[0]).expect("finding serializes");

    assert_eq!(json["rule_id"], "NNC-R001");
    assert_eq!(json["severity"], "warning");
    assert_eq!(json["category"], "Readability");
    assert_eq!(json["line"], 2);
    assert!(json["span"]["start"].is_u64());
    assert!(json["span"]["end"].is_u64());
}
