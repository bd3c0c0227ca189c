//! Tree rewrite for flagged occurrences.
//!
//! The host re-resolves a diagnostic's recorded span against the current
//! tree and asks this module for a corrected tree. Under the host's batch
//! fix mode the rewriter is invoked once per remaining occurrence over
//! progressively updated trees; each call is independent and replaces
//! exactly one node.

mod rewriter;

pub use rewriter::{rewrite_at, FixError};
