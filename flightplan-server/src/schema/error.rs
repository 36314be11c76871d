//! Schema construction errors.

/// Errors raised while building a schema.
///
/// These are configuration mistakes, caught once at startup rather than on
/// every parsed record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Type tag is not one of the supported field types
    #[error("unrecognized field type tag: {0}")]
    UnknownTypeTag(String),

    /// Formatter name is not registered
    #[error("unrecognized formatter: {0}")]
    UnknownFormatter(String),

    /// Same field declared twice
    #[error("field declared twice: {0}")]
    DuplicateField(String),

    /// Minimum length exceeds maximum
    #[error("field {field} has min {min} greater than max {max}")]
    InvertedBounds { field: String, min: usize, max: usize },
}
