//! End-to-end tests for the HasValue fix
//! Detection feeds the rewriter the recorded span, as the host would
#![allow(clippy::expect_used)]

use nullable_null_check::detector::run_rules;
use nullable_null_check::fix::{rewrite_at, FixError};
use nullable_null_check::rules::readability::get_readability_rules;
use nullable_null_check::rules::Finding;
use nullable_null_check::syntax::{SourceUnit, Span};
use nullable_null_check::test_utils::{parse_unit, type_table_for};
use nullable_null_check::utils::LineIndex;
use std::path::PathBuf;

fn detect_in(unit: &SourceUnit, source: &str) -> Vec<Finding> {
    // The type table is derived from declarations, which no fix touches,
    // so re-deriving it per cycle mirrors the host's re-analysis.
    let table = type_table_for(unit);
    run_rules(
        unit,
        get_readability_rules(),
        PathBuf::from("test.cs"),
        LineIndex::new(source),
        &table,
    )
}

#[test]
fn test_fix_rewrites_if_condition() {
    let source = "int? a;\nif (a.HasValue) { }";
    let unit = parse_unit(source).expect("fixture parses");
    let findings = detect_in(&unit, source);
    assert_eq!(findings.len(), 1);

    let fixed = rewrite_at(&unit, findings[0].span).expect("fix applies");
    assert_eq!(fixed.body[1].to_string(), "if (a != null) { }");
    // The declaration is untouched.
    assert_eq!(fixed.body[0], unit.body[0]);
}

#[test]
fn test_fix_then_redetect_reports_nothing() {
    let source = "int? a;\nif (a.HasValue) { }";
    let unit = parse_unit(source).expect("fixture parses");
    let findings = detect_in(&unit, source);

    let fixed = rewrite_at(&unit, findings[0].span).expect("fix applies");
    assert!(detect_in(&fixed, source).is_empty());
}

#[test]
fn test_fixing_one_occurrence_keeps_the_other() {
    let source = "int? a;\nint? b;\nif (a.HasValue && b.HasValue) { }";
    let unit = parse_unit(source).expect("fixture parses");
    let findings = detect_in(&unit, source);
    assert_eq!(findings.len(), 2);

    let fixed = rewrite_at(&unit, findings[0].span).expect("fix applies");
    let remaining = detect_in(&fixed, source);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].span, findings[1].span);

    assert_eq!(
        fixed.body[2].to_string(),
        "if (a != null && b.HasValue) { }"
    );
}

#[test]
fn test_batch_fix_terminates_with_zero_occurrences() {
    let source = "int? a;\nint? b;\nint? c;\nint keep = 1;\nif (a.HasValue && b.HasValue) { }\nwhile (c.HasValue) { c = null; }";
    let mut unit = parse_unit(source).expect("fixture parses");
    assert_eq!(detect_in(&unit, source).len(), 3);

    // Sequential reapplication, one remaining occurrence per step,
    // the way the host's batch-fix mode drives the rewriter.
    let mut steps = 0;
    loop {
        let findings = detect_in(&unit, source);
        let Some(first) = findings.first() else { break };
        unit = rewrite_at(&unit, first.span).expect("fix applies");
        steps += 1;
        assert!(steps <= 3, "batch fixing must terminate");
    }

    assert_eq!(steps, 3);
    assert!(detect_in(&unit, source).is_empty());
    let rendered = unit.to_string();
    assert!(rendered.contains("int keep = 1;"));
    assert!(rendered.contains("if (a != null && b != null) { }"));
    assert!(rendered.contains("while (c != null) { c = null; }"));
}

#[test]
fn test_fix_locates_node_from_member_token() {
    // Hosts may record the span of the inner name token; the rewriter walks
    // up to the enclosing member access.
    let source = "int? a;\nif (a.HasValue) { }";
    let unit = parse_unit(source).expect("fixture parses");

    let start = source.find("HasValue").expect("token present");
    let fixed = rewrite_at(&unit, Span::new(start, start + "HasValue".len()))
        .expect("fix applies");
    assert_eq!(fixed.body[1].to_string(), "if (a != null) { }");
}

#[test]
fn test_fix_fails_loudly_on_stale_location() {
    let source = "int? a;\nif (a.HasValue) { }";
    let unit = parse_unit(source).expect("fixture parses");
    let findings = detect_in(&unit, source);
    let fixed = rewrite_at(&unit, findings[0].span).expect("fix applies");

    // The same span now covers a comparison, not a member access.
    let err = rewrite_at(&fixed, findings[0].span).expect_err("stale location");
    assert!(matches!(err, FixError::NoMemberAccess { .. }));
}
