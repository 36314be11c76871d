//! Declarative field schemas.
//!
//! A [`ModelSchema`] describes every field a submission may carry: how the
//! raw value is coerced, whether it must be present, and which length bounds
//! or formatter apply. Schemas are built once at startup and passed by
//! reference into every parse.

mod error;
mod field;
mod model;

pub use error::SchemaError;
pub use field::{FieldRule, FieldSpec, FieldType, FormatterId};
pub use model::{ModelSchema, SchemaBuilder, Schemas};
