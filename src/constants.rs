//! Shared literals for the rule set.

/// Simple name of the nullable wrapper type.
pub const NULLABLE_TYPE_NAME: &str = "Nullable";

/// Accessor used to test a nullable wrapper for a value.
pub const HAS_VALUE_MEMBER: &str = "HasValue";

/// Source text of the absence literal the fix compares against.
pub const NULL_LITERAL_TEXT: &str = "null";

/// Category label for the readability rule set.
pub const CATEGORY_READABILITY: &str = "Readability";
