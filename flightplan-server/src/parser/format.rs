//! Registered custom formatters.
//!
//! Dispatch is a closed match on [`FormatterId`]: adding a formatter means
//! adding a variant and an arm here.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::route::{RouteInput, tokenize};
use crate::schema::FormatterId;

use super::coerce::{coerce_string, json_kind};
use super::error::FormatError;
use super::value::{FieldValue, HoursMinutes, Procedure};
use super::{Diagnostic, ParseContext};

static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(\d+)$").expect("time regex is valid"));

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("date regex is valid"));

/// A formatter's output: the value plus diagnostics from nested parsing.
#[derive(Debug)]
pub(crate) struct Formatted {
    pub value: FieldValue,
    pub diagnostics: Vec<Diagnostic>,
}

impl From<FieldValue> for Formatted {
    fn from(value: FieldValue) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }
}

/// Run a formatter. Nested diagnostic keys are prefixed with `key`.
pub(crate) fn apply(
    formatter: FormatterId,
    key: &str,
    raw: &Value,
    ctx: &ParseContext<'_>,
) -> Result<Formatted, FormatError> {
    match formatter {
        FormatterId::Time => format_time(raw).map(|t| FieldValue::Time(t).into()),
        FormatterId::Date => format_date(raw).map(|d| FieldValue::Date(d).into()),
        FormatterId::Route => format_route(key, raw, ctx),
        FormatterId::Procedure => format_procedure(key, raw, ctx),
    }
}

fn format_time(raw: &Value) -> Result<HoursMinutes, FormatError> {
    let unparseable = |input: String| FormatError::Unparseable {
        input,
        expected: "H:MM time",
    };

    match raw {
        Value::String(s) => {
            let caps = TIME_REGEX.captures(s).ok_or_else(|| unparseable(s.clone()))?;
            let hours: u32 = caps[1].parse().map_err(|_| unparseable(s.clone()))?;
            let minutes: u32 = caps[2].parse().map_err(|_| unparseable(s.clone()))?;
            if minutes >= 60 {
                return Err(unparseable(s.clone()));
            }
            Ok(HoursMinutes::new(hours, minutes))
        }
        // Already-parsed shape, so parsed plans round-trip.
        Value::Object(map) => {
            let part = |name: &'static str| -> Result<u32, FormatError> {
                map.get(name)
                    .and_then(Value::as_u64)
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or(FormatError::MissingPart(name))
            };
            let hours = part("hours")?;
            let minutes = part("minutes")?;
            if minutes >= 60 {
                return Err(unparseable(raw.to_string()));
            }
            Ok(HoursMinutes::new(hours, minutes))
        }
        other => Err(FormatError::WrongType {
            expected: "time",
            found: json_kind(other),
        }),
    }
}

fn format_date(raw: &Value) -> Result<NaiveDate, FormatError> {
    let Value::String(s) = raw else {
        return Err(FormatError::WrongType {
            expected: "date",
            found: json_kind(raw),
        });
    };

    let unparseable = || FormatError::Unparseable {
        input: s.clone(),
        expected: "YYYY-MM-DD date",
    };

    let caps = DATE_REGEX.captures(s).ok_or_else(unparseable)?;
    let year: i32 = caps[1].parse().map_err(|_| unparseable())?;
    let month: u32 = caps[2].parse().map_err(|_| unparseable())?;
    let day: u32 = caps[3].parse().map_err(|_| unparseable())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(unparseable)
}

fn format_route(key: &str, raw: &Value, ctx: &ParseContext<'_>) -> Result<Formatted, FormatError> {
    let input = match raw {
        Value::String(s) => RouteInput::Text(s),
        Value::Array(items) => RouteInput::Records(items),
        other => {
            return Err(FormatError::WrongType {
                expected: "route string or list",
                found: json_kind(other),
            });
        }
    };

    let tokenized = tokenize(input, ctx)?;
    let diagnostics = tokenized
        .diagnostics
        .into_iter()
        .map(|d| Diagnostic::new(format!("{key}{}", d.key), d.message))
        .collect();

    Ok(Formatted {
        value: FieldValue::Route(tokenized.route),
        diagnostics,
    })
}

fn format_procedure(
    key: &str,
    raw: &Value,
    ctx: &ParseContext<'_>,
) -> Result<Formatted, FormatError> {
    let Value::Object(map) = raw else {
        return Err(FormatError::WrongType {
            expected: "procedure record",
            found: json_kind(raw),
        });
    };

    let name = map.get("name").ok_or(FormatError::MissingPart("name"))?;
    let name = coerce_string(name)?;

    let (route, diagnostics) = match map.get("route") {
        Some(route) => {
            let formatted = format_route(&format!("{key}.route"), route, ctx)?;
            (formatted.value.as_route().cloned(), formatted.diagnostics)
        }
        None => (None, Vec::new()),
    };

    Ok(Formatted {
        value: FieldValue::Procedure(Procedure { name, route }),
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schemas;
    use serde_json::json;

    #[test]
    fn time_from_string() {
        assert_eq!(format_time(&json!("7:45")), Ok(HoursMinutes::new(7, 45)));
        assert_eq!(format_time(&json!("13:05")), Ok(HoursMinutes::new(13, 5)));
        assert_eq!(format_time(&json!("26:00")), Ok(HoursMinutes::new(26, 0)));
    }

    #[test]
    fn time_rejects_bad_strings() {
        assert!(format_time(&json!(":45")).is_err());
        assert!(format_time(&json!("7:")).is_err());
        assert!(format_time(&json!("0745")).is_err());
        assert!(format_time(&json!("7:75")).is_err());
        assert!(format_time(&json!(745)).is_err());
    }

    #[test]
    fn time_from_parsed_shape() {
        assert_eq!(
            format_time(&json!({"hours": 2, "minutes": 30})),
            Ok(HoursMinutes::new(2, 30))
        );
        assert_eq!(
            format_time(&json!({"hours": 2})),
            Err(FormatError::MissingPart("minutes"))
        );
    }

    #[test]
    fn date_parsing() {
        assert_eq!(
            format_date(&json!("2024-03-15")),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert!(format_date(&json!("2024-3-15")).is_err());
        assert!(format_date(&json!("2024-02-30")).is_err());
        assert!(format_date(&json!(20240315)).is_err());
    }

    #[test]
    fn procedure_with_route_prefixes_nested_diagnostics() {
        let schemas = Schemas::standard().unwrap();
        let ctx = ParseContext::new(&schemas);
        let raw = json!({
            "name": "BPK7G",
            "route": [{"name": "BPK", "altitude": "high"}]
        });

        let formatted = apply(FormatterId::Procedure, "sid", &raw, &ctx).unwrap();
        let procedure = formatted.value.as_procedure().unwrap();
        assert_eq!(procedure.name, "BPK7G");
        assert_eq!(procedure.route.as_ref().unwrap().len(), 1);
        assert_eq!(formatted.diagnostics.len(), 1);
        assert_eq!(formatted.diagnostics[0].key, "sid.route[0].altitude");
    }

    #[test]
    fn procedure_requires_name() {
        let schemas = Schemas::standard().unwrap();
        let ctx = ParseContext::new(&schemas);
        let result = apply(FormatterId::Procedure, "star", &json!({"route": "A B"}), &ctx);
        assert!(matches!(result, Err(FormatError::MissingPart("name"))));
    }

    #[test]
    fn route_rejects_numbers() {
        let schemas = Schemas::standard().unwrap();
        let ctx = ParseContext::new(&schemas);
        let result = apply(FormatterId::Route, "route", &json!(42), &ctx);
        assert!(matches!(result, Err(FormatError::WrongType { .. })));
    }
}
