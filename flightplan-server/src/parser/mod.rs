//! Schema-driven model parser.
//!
//! Applies a [`ModelSchema`] to untyped JSON input. Every key is handled
//! independently: unknown keys and values that fail coercion, bounds or a
//! formatter become [`Diagnostic`]s and are left out of the result. Only
//! after all keys are processed are required fields checked, and a missing
//! one is the single fatal outcome.

mod coerce;
mod error;
mod format;
mod value;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::schema::{FieldRule, FieldSpec, ModelSchema, Schemas};

pub use error::{FormatError, ParseError};
pub use value::{FieldValue, HoursMinutes, Procedure};

/// Parsed fields keyed by name.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// A non-fatal problem with one input key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub key: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Dependencies available to formatters.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    /// Schemas for nested entities, such as structured route waypoints.
    pub schemas: &'a Schemas,
}

impl<'a> ParseContext<'a> {
    pub fn new(schemas: &'a Schemas) -> Self {
        Self { schemas }
    }
}

/// Output of a successful parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    pub fields: FieldMap,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse raw input against a schema, failing if a required field is absent.
pub fn parse(
    raw: &Map<String, Value>,
    schema: &ModelSchema,
    ctx: &ParseContext<'_>,
) -> Result<ParseResult, ParseError> {
    let result = parse_fields(raw, schema, ctx);
    check_required(schema, &result.fields)?;
    Ok(result)
}

/// Parse every key without the required-field check.
pub fn parse_fields(
    raw: &Map<String, Value>,
    schema: &ModelSchema,
    ctx: &ParseContext<'_>,
) -> ParseResult {
    let mut result = ParseResult::default();

    for (key, value) in raw {
        let Some(spec) = schema.get(key) else {
            result
                .diagnostics
                .push(Diagnostic::new(key, format!("unknown field {key}, skipped")));
            continue;
        };

        match parse_field(key, value, spec, ctx) {
            Ok(formatted) => {
                result.diagnostics.extend(formatted.diagnostics);
                result.fields.insert(key.clone(), formatted.value);
            }
            Err(diagnostic) => result.diagnostics.push(diagnostic),
        }
    }

    if !result.diagnostics.is_empty() {
        warn!(diagnostics = ?result.diagnostics, "parser diagnostics");
    }

    result
}

/// Check that every required field of `schema` is present in `fields`.
///
/// Reports the first missing field in schema declaration order.
pub fn check_required(schema: &ModelSchema, fields: &FieldMap) -> Result<(), ParseError> {
    if let Some(missing) = schema
        .required_fields()
        .find(|name| !fields.contains_key(*name))
    {
        error!(field = missing, "missing required field");
        return Err(ParseError::MissingField {
            field: missing.to_string(),
        });
    }
    Ok(())
}

fn parse_field(
    key: &str,
    raw: &Value,
    spec: &FieldSpec,
    ctx: &ParseContext<'_>,
) -> Result<format::Formatted, Diagnostic> {
    let wrong_format =
        |e: FormatError| Diagnostic::new(key, format!("input {raw} in wrong format for {key}: {e}"));

    match spec.rule {
        FieldRule::Plain(ty) => coerce::coerce(raw, ty).map(Into::into).map_err(wrong_format),
        FieldRule::Custom(formatter) => format::apply(formatter, key, raw, ctx).map_err(wrong_format),
        FieldRule::Bounded { ty, min, max } => {
            let value = coerce::coerce(raw, ty).map_err(wrong_format)?;

            if min.is_some() || max.is_some() {
                let Some(len) = coerce::raw_len(raw) else {
                    return Err(Diagnostic::new(
                        key,
                        format!("input {raw} for {key} has no length to bound"),
                    ));
                };
                if let Some(max) = max.filter(|max| len > *max) {
                    return Err(Diagnostic::new(
                        key,
                        format!("{key} longer than max length {max}, skipped"),
                    ));
                }
                if let Some(min) = min.filter(|min| len < *min) {
                    return Err(Diagnostic::new(
                        key,
                        format!("{key} shorter than min length {min}, skipped"),
                    ));
                }
            }

            Ok(value.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, FieldType};
    use proptest::prelude::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn valid_plan() -> Map<String, Value> {
        object(json!({
            "callsign": "BAW123",
            "departure": "EGLL",
            "destination": "KJFK",
            "route": "ALPHA DCT BRAVO",
        }))
    }

    #[test]
    fn parses_valid_plan_without_diagnostics() {
        let schemas = Schemas::standard().unwrap();
        let ctx = ParseContext::new(&schemas);

        let result = parse(&valid_plan(), &schemas.plan, &ctx).unwrap();

        assert!(result.diagnostics.is_empty());
        assert_eq!(result.fields["callsign"].as_str(), Some("BAW123"));
        assert_eq!(result.fields["route"].as_route().unwrap().len(), 3);
    }

    #[test]
    fn unknown_field_is_one_diagnostic() {
        let schemas = Schemas::standard().unwrap();
        let ctx = ParseContext::new(&schemas);
        let mut raw = valid_plan();
        raw.insert("squawk".into(), json!("7000"));

        let result = parse(&raw, &schemas.plan, &ctx).unwrap();

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].key, "squawk");
        assert!(!result.fields.contains_key("squawk"));
        assert_eq!(result.fields.len(), 4);
    }

    #[test]
    fn missing_required_field_is_fatal() {
        let schemas = Schemas::standard().unwrap();
        let ctx = ParseContext::new(&schemas);
        let mut raw = valid_plan();
        raw.remove("callsign");

        let err = parse(&raw, &schemas.plan, &ctx).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingField {
                field: "callsign".into()
            }
        );
    }

    #[test]
    fn required_field_failing_bounds_is_fatal() {
        let schemas = Schemas::standard().unwrap();
        let ctx = ParseContext::new(&schemas);
        let mut raw = valid_plan();
        raw.insert("destination".into(), json!("KJF"));

        let err = parse(&raw, &schemas.plan, &ctx).unwrap_err();
        assert_eq!(err.field(), "destination");

        // Without the required check the min-length diagnostic is visible.
        let result = parse_fields(&raw, &schemas.plan, &ctx);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].key, "destination");
        assert!(result.diagnostics[0].message.contains("min length 4"));
    }

    #[test]
    fn max_checked_before_min_with_single_diagnostic() {
        let schema = ModelSchema::builder()
            .field("code", FieldSpec::bounded(FieldType::String, Some(4), Some(4)))
            .build()
            .unwrap();
        let schemas = Schemas::standard().unwrap();
        let ctx = ParseContext::new(&schemas);

        let result = parse_fields(&object(json!({"code": "KJFKX"})), &schema, &ctx);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].message.contains("max length 4"));
        assert!(result.fields.is_empty());
    }

    #[test]
    fn bounds_apply_to_raw_value_length() {
        let schema = ModelSchema::builder()
            .field("runway", FieldSpec::bounded(FieldType::String, None, Some(3)))
            .build()
            .unwrap();
        let schemas = Schemas::standard().unwrap();
        let ctx = ParseContext::new(&schemas);

        let result = parse_fields(&object(json!({"runway": 27})), &schema, &ctx);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.fields.is_empty());

        let result = parse_fields(&object(json!({"runway": "27L"})), &schema, &ctx);
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.fields["runway"].as_str(), Some("27L"));
    }

    #[test]
    fn coercion_failure_drops_field_and_continues() {
        let schemas = Schemas::standard().unwrap();
        let ctx = ParseContext::new(&schemas);
        let mut raw = valid_plan();
        raw.insert("cruise_altitude".into(), json!("FL350"));
        raw.insert("pax".into(), json!("180"));
        raw.insert("air_time".into(), json!("seven hours"));

        let result = parse(&raw, &schemas.plan, &ctx).unwrap();

        assert_eq!(result.diagnostics.len(), 2);
        assert!(!result.fields.contains_key("cruise_altitude"));
        assert!(!result.fields.contains_key("air_time"));
        assert_eq!(result.fields["pax"].as_int(), Some(180));
    }

    #[test]
    fn formatted_fields_are_typed() {
        let schemas = Schemas::standard().unwrap();
        let ctx = ParseContext::new(&schemas);
        let mut raw = valid_plan();
        raw.insert("departure_time".into(), json!("9:30"));
        raw.insert("departure_date".into(), json!("2024-03-15"));
        raw.insert("sid".into(), json!({"name": "CPT3F"}));

        let result = parse(&raw, &schemas.plan, &ctx).unwrap();

        assert_eq!(
            result.fields["departure_time"].as_time(),
            Some(HoursMinutes::new(9, 30))
        );
        assert_eq!(
            result.fields["departure_date"].as_date(),
            chrono::NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(result.fields["sid"].as_procedure().unwrap().name, "CPT3F");
    }

    #[test]
    fn structured_route_waypoint_diagnostics_are_prefixed() {
        let schemas = Schemas::standard().unwrap();
        let ctx = ParseContext::new(&schemas);
        let mut raw = valid_plan();
        raw.insert(
            "route".into(),
            json!([
                {"name": "ALPHA", "latitude": 51.0, "longitude": -1.0},
                {"name": "BRAVO", "speed": "fast"},
            ]),
        );

        let result = parse(&raw, &schemas.plan, &ctx).unwrap();

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].key, "route[1].speed");
        assert_eq!(result.fields["route"].as_route().unwrap().len(), 2);
    }

    #[test]
    fn reparsing_output_is_idempotent() {
        let schemas = Schemas::standard().unwrap();
        let ctx = ParseContext::new(&schemas);
        let mut raw = valid_plan();
        raw.insert("departure_time".into(), json!("9:30"));
        raw.insert("departure_date".into(), json!("2024-03-15"));
        raw.insert("cruise_altitude".into(), json!("35000"));
        raw.insert(
            "star".into(),
            json!({"name": "ROBUC1", "route": [{"name": "ROBUC", "altitude": 8000}]}),
        );

        let first = parse(&raw, &schemas.plan, &ctx).unwrap();
        let reserialized = object(serde_json::to_value(&first.fields).unwrap());
        let second = parse(&reserialized, &schemas.plan, &ctx).unwrap();

        assert!(second.diagnostics.is_empty());
        assert_eq!(first.fields, second.fields);
    }

    proptest! {
        /// Omitting any single required field names exactly that field.
        #[test]
        fn omitted_required_field_is_named(idx in 0usize..4) {
            let schemas = Schemas::standard().unwrap();
            let ctx = ParseContext::new(&schemas);
            let required: Vec<&str> = schemas.plan.required_fields().collect();
            let mut raw = valid_plan();
            raw.remove(required[idx]);

            let err = parse(&raw, &schemas.plan, &ctx).unwrap_err();
            prop_assert_eq!(err.field(), required[idx]);
        }

        /// An extra unrecognized key never blocks a valid plan.
        #[test]
        fn unknown_key_tolerated(key in "x_[a-z]{1,12}", value in "[ -~]{0,20}") {
            let schemas = Schemas::standard().unwrap();
            let ctx = ParseContext::new(&schemas);
            let mut raw = valid_plan();
            raw.insert(key.clone(), json!(value));

            let result = parse(&raw, &schemas.plan, &ctx).unwrap();
            prop_assert_eq!(result.diagnostics.len(), 1);
            prop_assert_eq!(&result.diagnostics[0].key, &key);
        }

        /// Destinations of the wrong length fail on the destination field.
        #[test]
        fn wrong_length_destination_is_fatal(dest in "[A-Z]{0,3}|[A-Z]{5,8}") {
            let schemas = Schemas::standard().unwrap();
            let ctx = ParseContext::new(&schemas);
            let mut raw = valid_plan();
            raw.insert("destination".into(), json!(dest));

            let err = parse(&raw, &schemas.plan, &ctx).unwrap_err();
            prop_assert_eq!(err.field(), "destination");
        }
    }
}
