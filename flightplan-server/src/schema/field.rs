//! Field specifications.

use std::fmt;
use std::str::FromStr;

use super::error::SchemaError;

/// The closed set of primitive field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Integer,
    Float,
}

impl FieldType {
    /// Look up a field type by its tag.
    ///
    /// Accepts both the short tags (`str`, `int`, `float`) and the long
    /// names (`string`, `integer`).
    pub fn from_tag(tag: &str) -> Result<Self, SchemaError> {
        match tag {
            "str" | "string" => Ok(FieldType::String),
            "int" | "integer" => Ok(FieldType::Integer),
            "float" => Ok(FieldType::Float),
            other => Err(SchemaError::UnknownTypeTag(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
        }
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one of the registered custom formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatterId {
    /// `H:MM` or `{hours, minutes}`
    Time,
    /// `YYYY-MM-DD`
    Date,
    /// Route string or ordered list of waypoint records
    Route,
    /// SID/STAR procedure: `{name, route?}`
    Procedure,
}

impl FormatterId {
    pub fn from_name(name: &str) -> Result<Self, SchemaError> {
        match name {
            "time" => Ok(FormatterId::Time),
            "date" => Ok(FormatterId::Date),
            "route" => Ok(FormatterId::Route),
            "procedure" | "sid_star" => Ok(FormatterId::Procedure),
            other => Err(SchemaError::UnknownFormatter(other.to_string())),
        }
    }
}

/// How a raw value becomes a typed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    /// Direct type coercion.
    Plain(FieldType),

    /// Coercion followed by length bounds on the raw value.
    Bounded {
        ty: FieldType,
        min: Option<usize>,
        max: Option<usize>,
    },

    /// Delegates to a registered formatter.
    Custom(FormatterId),
}

/// One entry of a [`ModelSchema`](super::ModelSchema).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub rule: FieldRule,
    pub required: bool,
}

impl FieldSpec {
    pub fn plain(ty: FieldType) -> Self {
        Self {
            rule: FieldRule::Plain(ty),
            required: false,
        }
    }

    pub fn bounded(ty: FieldType, min: Option<usize>, max: Option<usize>) -> Self {
        Self {
            rule: FieldRule::Bounded { ty, min, max },
            required: false,
        }
    }

    pub fn custom(formatter: FormatterId) -> Self {
        Self {
            rule: FieldRule::Custom(formatter),
            required: false,
        }
    }

    /// A plain spec from a type tag such as `"int"`.
    pub fn from_tag(tag: &str) -> Result<Self, SchemaError> {
        FieldType::from_tag(tag).map(Self::plain)
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}
