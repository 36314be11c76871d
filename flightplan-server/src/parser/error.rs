//! Parser error types.
//!
//! Only [`ParseError`] ever aborts a parse. [`FormatError`] describes why a
//! single field could not be produced; the parser turns it into a
//! diagnostic and carries on.

/// Fatal parse failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A required field is absent after validation
    #[error("missing required field {field}")]
    MissingField { field: String },
}

impl ParseError {
    /// Name of the field that caused the failure.
    pub fn field(&self) -> &str {
        match self {
            ParseError::MissingField { field } => field,
        }
    }
}

/// Why one raw value could not be turned into a field value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    /// The JSON value has the wrong shape for the target
    #[error("expected {expected}, got {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    /// A string could not be read as the target
    #[error("cannot read {input:?} as {expected}")]
    Unparseable {
        input: String,
        expected: &'static str,
    },

    /// A record is missing a part the formatter needs
    #[error("missing {0}")]
    MissingPart(&'static str),

    /// A structured route element is not a record
    #[error("route element {index} is not a record")]
    NotARecord { index: usize },

    /// A structured route element failed its own schema
    #[error("waypoint {index}: {source}")]
    Waypoint { index: usize, source: ParseError },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ParseError::MissingField {
            field: "callsign".into(),
        };
        assert_eq!(err.to_string(), "missing required field callsign");
        assert_eq!(err.field(), "callsign");

        let err = FormatError::WrongType {
            expected: "integer",
            found: "array",
        };
        assert_eq!(err.to_string(), "expected integer, got array");

        let err = FormatError::Unparseable {
            input: "9h30".into(),
            expected: "H:MM time",
        };
        assert_eq!(err.to_string(), "cannot read \"9h30\" as H:MM time");

        let err = FormatError::Waypoint {
            index: 2,
            source: ParseError::MissingField {
                field: "name".into(),
            },
        };
        assert_eq!(err.to_string(), "waypoint 2: missing required field name");
    }
}
