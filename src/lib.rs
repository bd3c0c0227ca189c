//! Analyzer add-on that flags `Nullable<T>` null checks written with
//! `HasValue` and rewrites them to `!= null` comparisons.
//!
//! The host runtime owns parsing, type resolution, diagnostic routing, and
//! batch-fix orchestration. This crate supplies the two cooperating pieces
//! of logic behind the rule: a detection walk over the host's syntax tree
//! and a structural tree rewrite for one flagged occurrence, both exposed
//! through a static rule table in [`registry`].

#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

/// Module containing shared literals for the rule set.
pub mod constants;

/// Module containing the detection visitor and entry point.
pub mod detector;

/// Module containing the structural fix rewriter.
pub mod fix;

/// Module containing the static rule table exposed to the host.
pub mod registry;

/// Module containing the rule trait, finding model, and rule implementations.
pub mod rules;

/// Module defining the host's type-query capability.
pub mod semantics;

/// Module defining the host-boundary syntax tree.
pub mod syntax;

/// Module containing test utilities.
/// Simulates the host boundary (parsing, local typing) for the test suite.
pub mod test_utils;

/// Module containing utility functions (line/column mapping).
pub mod utils;
