//! Typed field values.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::route::Route;

/// A duration or clock reading in hours and minutes.
///
/// Hours are not capped at 24: the same shape carries air time and fuel
/// endurance as well as departure time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HoursMinutes {
    pub hours: u32,
    pub minutes: u32,
}

impl HoursMinutes {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    /// Four-digit `HHMM` form used by filing forms.
    pub fn to_hhmm(&self) -> String {
        format!("{:02}{:02}", self.hours, self.minutes)
    }
}

impl fmt::Display for HoursMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hours, self.minutes)
    }
}

/// A named departure or arrival procedure with an optional sub-route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Procedure {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

/// A parsed, typed field value.
///
/// Serializes to the same JSON shape the parser accepts, so a parsed map
/// can be fed back through the parser unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Time(HoursMinutes),
    Date(NaiveDate),
    Route(Route),
    Procedure(Procedure),
}

impl FieldValue {
    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::Int(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Time(_) => "time",
            FieldValue::Date(_) => "date",
            FieldValue::Route(_) => "route",
            FieldValue::Procedure(_) => "procedure",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<HoursMinutes> {
        match self {
            FieldValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_route(&self) -> Option<&Route> {
        match self {
            FieldValue::Route(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_route_mut(&mut self) -> Option<&mut Route> {
        match self {
            FieldValue::Route(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_procedure(&self) -> Option<&Procedure> {
        match self {
            FieldValue::Procedure(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_procedure_mut(&mut self) -> Option<&mut Procedure> {
        match self {
            FieldValue::Procedure(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::Int(n) => write!(f, "{n}"),
            FieldValue::Float(n) => write!(f, "{n}"),
            FieldValue::Time(t) => write!(f, "{t}"),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Route(r) => write!(f, "{r}"),
            FieldValue::Procedure(p) => f.write_str(&p.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hours_minutes_formats() {
        let t = HoursMinutes::new(9, 5);
        assert_eq!(t.to_string(), "9:05");
        assert_eq!(t.to_hhmm(), "0905");
    }

    #[test]
    fn serializes_in_input_shape() {
        assert_eq!(
            serde_json::to_value(FieldValue::Str("BAW123".into())).unwrap(),
            json!("BAW123")
        );
        assert_eq!(serde_json::to_value(FieldValue::Int(350)).unwrap(), json!(350));
        assert_eq!(
            serde_json::to_value(FieldValue::Time(HoursMinutes::new(7, 45))).unwrap(),
            json!({"hours": 7, "minutes": 45})
        );
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            serde_json::to_value(FieldValue::Date(date)).unwrap(),
            json!("2024-03-15")
        );
    }

    #[test]
    fn accessors_match_variant() {
        let v = FieldValue::Int(12);
        assert_eq!(v.as_int(), Some(12));
        assert_eq!(v.as_str(), None);
        assert_eq!(v.kind(), "integer");

        let v = FieldValue::Str("EGLL".into());
        assert_eq!(v.as_str(), Some("EGLL"));
        assert_eq!(v.to_string(), "EGLL");
    }
}
