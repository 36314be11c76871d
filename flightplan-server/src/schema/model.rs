//! Ordered field schemas and the standard plan/waypoint definitions.

use std::collections::HashSet;
use std::sync::Arc;

use super::error::SchemaError;
use super::field::{FieldRule, FieldSpec, FieldType, FormatterId};

/// An ordered mapping from field name to [`FieldSpec`].
///
/// Immutable once built. Declaration order is kept so that required-field
/// failures are reported deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSchema {
    fields: Vec<(String, FieldSpec)>,
}

impl ModelSchema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Look up the spec for a field.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, spec)| spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Names of required fields, in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`ModelSchema`].
///
/// Validation problems are collected and reported by [`build`](Self::build),
/// so a schema can be declared as one chain.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<(String, FieldSpec)>,
    error: Option<SchemaError>,
}

impl SchemaBuilder {
    /// Declare a field.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        let name = name.into();
        if self.error.is_none() {
            if let FieldRule::Bounded {
                min: Some(min),
                max: Some(max),
                ..
            } = spec.rule
            {
                if min > max {
                    self.error = Some(SchemaError::InvertedBounds {
                        field: name.clone(),
                        min,
                        max,
                    });
                }
            }
        }
        self.fields.push((name, spec));
        self
    }

    /// Declare a plain field from a type tag such as `"int"`.
    pub fn tagged(self, name: impl Into<String>, tag: &str) -> Self {
        match FieldSpec::from_tag(tag) {
            Ok(spec) => self.field(name, spec),
            Err(e) => self.fail(e),
        }
    }

    /// Declare a field handled by the named formatter, such as `"time"`.
    pub fn formatted(self, name: impl Into<String>, formatter: &str) -> Self {
        match FormatterId::from_name(formatter) {
            Ok(id) => self.field(name, FieldSpec::custom(id)),
            Err(e) => self.fail(e),
        }
    }

    fn fail(mut self, error: SchemaError) -> Self {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self
    }

    pub fn build(self) -> Result<ModelSchema, SchemaError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut seen = HashSet::new();
        for (name, _) in &self.fields {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateField(name.clone()));
            }
        }

        Ok(ModelSchema {
            fields: self.fields,
        })
    }
}

/// The two schemas the system works with.
#[derive(Debug, Clone)]
pub struct Schemas {
    /// Top-level plan fields.
    pub plan: Arc<ModelSchema>,

    /// Fields of one structured route waypoint.
    pub waypoint: Arc<ModelSchema>,
}

impl Schemas {
    pub fn new(plan: ModelSchema, waypoint: ModelSchema) -> Self {
        Self {
            plan: Arc::new(plan),
            waypoint: Arc::new(waypoint),
        }
    }

    /// The standard flight-plan and waypoint schemas.
    pub fn standard() -> Result<Self, SchemaError> {
        Ok(Self::new(plan_schema()?, waypoint_schema()?))
    }
}

fn plan_schema() -> Result<ModelSchema, SchemaError> {
    let text = FieldType::String;

    ModelSchema::builder()
        .formatted("air_time", "time")
        .tagged("airac", "int")
        .tagged("aircraft", "str")
        .tagged("airline", "str")
        .tagged("alternative", "str")
        .tagged("block_fuel", "int")
        .formatted("block_time", "time")
        .field("callsign", FieldSpec::plain(text).required())
        .tagged("cruise_altitude", "int")
        .field("departure", FieldSpec::plain(text).required())
        .formatted("departure_date", "date")
        .formatted("departure_time", "time")
        .field("departure_runway", FieldSpec::bounded(text, None, Some(3)))
        .field(
            "destination",
            FieldSpec::bounded(text, Some(4), Some(4)).required(),
        )
        .field("destination_runway", FieldSpec::bounded(text, None, Some(3)))
        .tagged("flight_code", "str")
        .field("route", FieldSpec::custom(FormatterId::Route).required())
        .formatted("sid", "sid_star")
        .formatted("star", "sid_star")
        .field("cruise_speed", FieldSpec::plain(FieldType::Integer))
        .tagged("tow", "int")
        .tagged("units", "str")
        .tagged("zfw", "int")
        .tagged("remarks", "str")
        .tagged("equipment", "str")
        .tagged("type", "str")
        .tagged("alternate", "str")
        .tagged("equipment_suffix", "str")
        .tagged("distance", "int")
        .formatted("fuel_endurance", "time")
        .tagged("pax", "int")
        .tagged("cargo", "int")
        .build()
}

fn waypoint_schema() -> Result<ModelSchema, SchemaError> {
    ModelSchema::builder()
        .field("name", FieldSpec::plain(FieldType::String).required())
        .tagged("latitude", "float")
        .tagged("longitude", "float")
        .tagged("altitude", "int")
        .tagged("speed", "int")
        .tagged("kind", "str")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_schemas_build() {
        let schemas = Schemas::standard().unwrap();
        assert!(schemas.plan.contains("callsign"));
        assert!(schemas.plan.contains("route"));
        assert!(!schemas.plan.contains("name"));
        assert!(schemas.waypoint.contains("name"));
        assert_eq!(schemas.waypoint.len(), 6);
    }

    #[test]
    fn required_fields_in_declaration_order() {
        let schemas = Schemas::standard().unwrap();
        let required: Vec<&str> = schemas.plan.required_fields().collect();
        assert_eq!(required, vec!["callsign", "departure", "destination", "route"]);
    }

    #[test]
    fn destination_is_bounded_to_four() {
        let schemas = Schemas::standard().unwrap();
        let spec = schemas.plan.get("destination").unwrap();
        assert!(spec.required);
        assert_eq!(
            spec.rule,
            FieldRule::Bounded {
                ty: FieldType::String,
                min: Some(4),
                max: Some(4),
            }
        );
    }

    #[test]
    fn unknown_tag_fails_build() {
        let result = ModelSchema::builder()
            .tagged("a", "str")
            .tagged("b", "complex")
            .build();
        assert_eq!(result, Err(SchemaError::UnknownTypeTag("complex".into())));
    }

    #[test]
    fn formatter_fields_by_name() {
        let schemas = Schemas::standard().unwrap();
        assert_eq!(
            schemas.plan.get("star").unwrap().rule,
            FieldRule::Custom(FormatterId::Procedure)
        );
        assert_eq!(
            schemas.plan.get("fuel_endurance").unwrap().rule,
            FieldRule::Custom(FormatterId::Time)
        );

        let result = ModelSchema::builder()
            .formatted("a", "time")
            .formatted("b", "eval")
            .build();
        assert_eq!(result, Err(SchemaError::UnknownFormatter("eval".into())));
    }

    #[test]
    fn duplicate_field_fails_build() {
        let result = ModelSchema::builder()
            .tagged("a", "str")
            .tagged("a", "int")
            .build();
        assert_eq!(result, Err(SchemaError::DuplicateField("a".into())));
    }

    #[test]
    fn inverted_bounds_fail_build() {
        let result = ModelSchema::builder()
            .field("a", FieldSpec::bounded(FieldType::String, Some(5), Some(2)))
            .build();
        assert!(matches!(result, Err(SchemaError::InvertedBounds { .. })));
    }

    #[test]
    fn iteration_keeps_declaration_order() {
        let schema = ModelSchema::builder()
            .tagged("z", "str")
            .tagged("a", "int")
            .build()
            .unwrap();
        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["z", "a"]);
        assert!(!schema.is_empty());
    }
}
