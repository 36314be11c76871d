//! Route tokenizer.

use serde_json::Value;

use crate::geo::Position;
use crate::parser::{Diagnostic, FormatError, ParseContext, ParseError, parse};

use super::{Route, Waypoint, WaypointKind};

/// The two accepted route representations.
#[derive(Debug, Clone, Copy)]
pub enum RouteInput<'a> {
    /// Space-delimited identifiers.
    Text(&'a str),
    /// Ordered waypoint records, each parsed with the waypoint schema.
    Records(&'a [Value]),
}

/// A tokenized route plus diagnostics from waypoint records.
///
/// Diagnostic keys are relative to the route, e.g. `[2].altitude`.
#[derive(Debug, Clone, Default)]
pub struct Tokenized {
    pub route: Route,
    pub diagnostics: Vec<Diagnostic>,
}

/// Turn a route representation into an ordered sequence of stubs.
///
/// Identifiers are taken as given; uppercasing is the caller's concern.
/// A record that is not an object or lacks a `name` fails the whole route.
pub fn tokenize(input: RouteInput<'_>, ctx: &ParseContext<'_>) -> Result<Tokenized, FormatError> {
    match input {
        RouteInput::Text(text) => Ok(Tokenized {
            route: Route::from_text(text),
            diagnostics: Vec::new(),
        }),
        RouteInput::Records(records) => {
            let mut waypoints = Vec::with_capacity(records.len());
            let mut diagnostics = Vec::new();

            for (index, record) in records.iter().enumerate() {
                let Value::Object(map) = record else {
                    return Err(FormatError::NotARecord { index });
                };

                let parsed = parse(map, &ctx.schemas.waypoint, ctx)
                    .map_err(|source| FormatError::Waypoint { index, source })?;

                diagnostics.extend(
                    parsed
                        .diagnostics
                        .into_iter()
                        .map(|d| Diagnostic::new(format!("[{index}].{}", d.key), d.message)),
                );

                let fields = parsed.fields;
                let Some(name) = fields.get("name").and_then(|v| v.as_str()) else {
                    return Err(FormatError::Waypoint {
                        index,
                        source: ParseError::MissingField {
                            field: "name".to_string(),
                        },
                    });
                };

                let mut waypoint = Waypoint::new(name);
                waypoint.altitude = fields.get("altitude").and_then(|v| v.as_int());
                waypoint.speed = fields.get("speed").and_then(|v| v.as_int());

                let latitude = fields.get("latitude").and_then(|v| v.as_float());
                let longitude = fields.get("longitude").and_then(|v| v.as_float());
                match (latitude, longitude) {
                    (Some(lat), Some(lon)) => waypoint.position = Some(Position::new(lat, lon)),
                    (None, None) => {}
                    _ => diagnostics.push(Diagnostic::new(
                        format!("[{index}].position"),
                        "latitude and longitude must be given together, both dropped",
                    )),
                }

                // Records from an enriched route keep their resolution.
                if let Some(kind) = fields.get("kind").and_then(|v| v.as_str()) {
                    match WaypointKind::from_name(kind) {
                        Some(kind) => {
                            waypoint.kind = Some(kind);
                            waypoint.unresolved = kind == WaypointKind::Unresolved;
                        }
                        None => diagnostics.push(Diagnostic::new(
                            format!("[{index}].kind"),
                            format!("unknown waypoint kind {kind}, skipped"),
                        )),
                    }
                }

                waypoints.push(waypoint);
            }

            Ok(Tokenized {
                route: Route::new(waypoints),
                diagnostics,
            })
        }
    }
}
