//! Centralized rule IDs.
//!
//! Hosts route "fix this diagnostic" requests back through these IDs, so
//! they are stable identifiers, never renumbered.

/// Readability: Nullable null check performed with `HasValue`.
pub const RULE_ID_NULLABLE_HAS_VALUE: &str = "NNC-R001";
