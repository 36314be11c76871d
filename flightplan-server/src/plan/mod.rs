//! The flight plan aggregate.
//!
//! A [`Plan`] owns the parsed field map, including the route, plus the
//! airport records looked up for it. It is created once from a submission
//! and may later be updated field by field.

mod error;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::navdata::{AirportRecord, NavDataProvider};
use crate::parser::{
    Diagnostic, FieldMap, FieldValue, HoursMinutes, ParseContext, Procedure, check_required,
    parse, parse_fields,
};
use crate::route::{EnrichConfig, Route, enrich};
use crate::schema::ModelSchema;
use crate::settings::Settings;

pub use error::PlanError;

/// Airport records for the plan's departure, destination and alternate.
///
/// An identifier the provider does not know leaves its entry empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Airports {
    pub departure: Option<AirportRecord>,
    pub destination: Option<AirportRecord>,
    pub alternate: Option<AirportRecord>,
}

/// A validated flight plan.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    fields: FieldMap,
    diagnostics: Vec<Diagnostic>,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    airports: Airports,
    #[serde(skip)]
    schema: Arc<ModelSchema>,
}

impl Plan {
    /// Parse a submission into a plan.
    ///
    /// Fails only when a required field is absent after validation; every
    /// other problem is kept as a diagnostic.
    pub fn create(raw: &Map<String, Value>, ctx: &ParseContext<'_>) -> Result<Self, PlanError> {
        let schema = Arc::clone(&ctx.schemas.plan);
        let parsed = parse(raw, &schema, ctx)?;

        let plan = Self {
            fields: parsed.fields,
            diagnostics: parsed.diagnostics,
            created_at: Utc::now(),
            updated_at: None,
            airports: Airports::default(),
            schema,
        };

        info!(
            callsign = plan.get_str("callsign").unwrap_or_default(),
            waypoints = plan.route().map_or(0, Route::len),
            diagnostics = plan.diagnostics.len(),
            "plan created"
        );
        Ok(plan)
    }

    /// Re-parse the supplied fields and merge them over the existing ones.
    ///
    /// Fields absent from `raw` are kept. Returns this update's diagnostics,
    /// which also replace the plan's stored diagnostics.
    pub fn update(
        &mut self,
        raw: &Map<String, Value>,
        ctx: &ParseContext<'_>,
    ) -> Result<Vec<Diagnostic>, PlanError> {
        let parsed = parse_fields(raw, &self.schema, ctx);

        let mut merged = self.fields.clone();
        merged.extend(parsed.fields);
        check_required(&self.schema, &merged)?;

        debug!(keys = raw.len(), "plan updated");
        self.fields = merged;
        self.diagnostics = parsed.diagnostics.clone();
        self.updated_at = Some(Utc::now());
        Ok(parsed.diagnostics)
    }

    /// Look up the departure, destination and alternate airports.
    ///
    /// Provider failures and timeouts leave the entry empty and are logged.
    pub async fn attach_airport_data<P: NavDataProvider>(
        &mut self,
        provider: &P,
        config: &EnrichConfig,
    ) {
        let (departure, destination, alternate) = futures::join!(
            lookup_airport(provider, self.get_str("departure"), config),
            lookup_airport(provider, self.get_str("destination"), config),
            lookup_airport(provider, self.get_str("alternate"), config),
        );

        self.airports = Airports {
            departure,
            destination,
            alternate,
        };
    }

    /// Enrich the route and the SID/STAR sub-routes.
    pub async fn enrich_route<P: NavDataProvider>(&mut self, provider: &P, config: &EnrichConfig) {
        if let Some(route) = self.fields.get_mut("route").and_then(FieldValue::as_route_mut) {
            enrich(route, provider, config).await;
        }

        for key in ["sid", "star"] {
            if let Some(route) = self
                .fields
                .get_mut(key)
                .and_then(FieldValue::as_procedure_mut)
                .and_then(|p| p.route.as_mut())
            {
                enrich(route, provider, config).await;
            }
        }
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn airports(&self) -> &Airports {
        &self.airports
    }

    /// Whether `other` is this plan at the same point in its history: the
    /// same submission with the same latest update.
    pub fn is_same_revision(&self, other: &Plan) -> bool {
        self.created_at == other.created_at && self.updated_at == other.updated_at
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// A string field, or `None` if absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_str)
    }

    /// Schema-aware field access.
    ///
    /// An absent optional field is `Ok(None)`; an absent required field and
    /// a key the schema does not define are errors.
    pub fn field(&self, key: &str) -> Result<Option<&FieldValue>, PlanError> {
        if let Some(value) = self.fields.get(key) {
            return Ok(Some(value));
        }

        match self.schema.get(key) {
            Some(spec) if spec.required => Err(PlanError::MissingField {
                field: key.to_string(),
            }),
            Some(_) => Ok(None),
            None => Err(PlanError::UnknownField {
                field: key.to_string(),
            }),
        }
    }

    pub fn str_field(&self, key: &str) -> Result<Option<&str>, PlanError> {
        self.typed_field(key, "string", FieldValue::as_str)
    }

    pub fn int_field(&self, key: &str) -> Result<Option<i64>, PlanError> {
        self.typed_field(key, "integer", FieldValue::as_int)
    }

    pub fn time_field(&self, key: &str) -> Result<Option<HoursMinutes>, PlanError> {
        self.typed_field(key, "time", FieldValue::as_time)
    }

    pub fn procedure_field(&self, key: &str) -> Result<Option<&Procedure>, PlanError> {
        self.typed_field(key, "procedure", FieldValue::as_procedure)
    }

    /// A string field that must be present, whatever the schema says.
    pub fn required_str(&self, key: &str) -> Result<&str, PlanError> {
        self.str_field(key)?.ok_or_else(|| PlanError::MissingField {
            field: key.to_string(),
        })
    }

    fn typed_field<'a, T>(
        &'a self,
        key: &str,
        expected: &'static str,
        cast: impl FnOnce(&'a FieldValue) -> Option<T>,
    ) -> Result<Option<T>, PlanError> {
        match self.field(key)? {
            None => Ok(None),
            Some(value) => cast(value).map(Some).ok_or_else(|| PlanError::WrongType {
                field: key.to_string(),
                expected,
            }),
        }
    }

    pub fn route(&self) -> Option<&Route> {
        self.get("route").and_then(FieldValue::as_route)
    }

    /// The route as filed text.
    ///
    /// With `include_procedures` the SID is prefixed and the STAR suffixed:
    /// by name, or with `open_procedures` by their own route when they have
    /// one.
    pub fn route_to_str(&self, include_procedures: bool, open_procedures: bool) -> String {
        let procedure = |key: &str| -> Option<String> {
            if !include_procedures {
                return None;
            }
            let procedure = self.procedure_field(key).ok().flatten()?;
            match (&procedure.route, open_procedures) {
                (Some(route), true) => Some(route.to_string()),
                _ => Some(procedure.name.clone()),
            }
        };

        [
            procedure("sid"),
            self.route().map(ToString::to_string),
            procedure("star"),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Pilot name from settings, optionally followed by `separator` and the
    /// home base.
    pub fn pilot(&self, settings: &Settings, separator: Option<&str>) -> String {
        match separator {
            Some(sep) => format!("{}{sep}{}", settings.pilot.name, settings.pilot.base),
            None => settings.pilot.name.clone(),
        }
    }

    /// Take the secondary plan's destination as alternate if this plan has
    /// none. Returns whether it was adopted.
    pub fn adopt_alternate_from(&mut self, secondary: &Plan) -> bool {
        if self.get_str("alternate").is_some_and(|a| !a.is_empty()) {
            return false;
        }
        let Some(destination) = secondary.get_str("destination") else {
            return false;
        };

        debug!(alternate = destination, "alternate taken from secondary plan");
        self.fields.insert(
            "alternate".to_string(),
            FieldValue::Str(destination.to_string()),
        );
        true
    }
}

async fn lookup_airport<P: NavDataProvider>(
    provider: &P,
    ident: Option<&str>,
    config: &EnrichConfig,
) -> Option<AirportRecord> {
    let ident = ident.filter(|i| !i.is_empty())?;

    match tokio::time::timeout(config.query_timeout, provider.airport(ident)).await {
        Ok(Ok(airport)) => {
            if airport.is_none() {
                debug!(ident, "airport not found");
            }
            airport
        }
        Ok(Err(e)) => {
            warn!(ident, error = %e, "airport lookup failed");
            None
        }
        Err(_) => {
            warn!(ident, "airport lookup timed out");
            None
        }
    }
}
