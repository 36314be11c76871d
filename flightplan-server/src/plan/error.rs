//! Plan error types.

use crate::parser::ParseError;

/// Errors creating a plan or reading its fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// A required field is absent
    #[error("missing required field {field}")]
    MissingField { field: String },

    /// The key is not part of the plan schema at all
    #[error("field {field} is not part of the plan schema")]
    UnknownField { field: String },

    /// The field holds a value of another type
    #[error("field {field} is not a {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
}

impl PlanError {
    /// Name of the field the error concerns.
    pub fn field(&self) -> &str {
        match self {
            PlanError::MissingField { field }
            | PlanError::UnknownField { field }
            | PlanError::WrongType { field, .. } => field,
        }
    }
}

impl From<ParseError> for PlanError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::MissingField { field } => PlanError::MissingField { field },
        }
    }
}
