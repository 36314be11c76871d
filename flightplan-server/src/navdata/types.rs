//! Navigation record types.
//!
//! Field names follow the OurAirports CSV headers, so the same structs read
//! the CSV files and the JSON of a remote navigation-data service.

use serde::{Deserialize, Serialize};

use crate::geo::Position;

/// A navaid, fix or airway segment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavRecord {
    pub ident: String,

    #[serde(default)]
    pub name: String,

    /// Decimal degrees; empty when the record has no coordinate.
    #[serde(default)]
    pub latitude_deg: String,

    #[serde(default)]
    pub longitude_deg: String,

    /// First fix of an airway segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_ident: Option<String>,
}

impl NavRecord {
    pub fn new(ident: impl Into<String>, latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            ident: ident.into(),
            name: String::new(),
            latitude_deg: latitude_deg.to_string(),
            longitude_deg: longitude_deg.to_string(),
            start_ident: None,
        }
    }

    /// An airway segment starting at `start_ident`, with no coordinate.
    pub fn airway(ident: impl Into<String>, start_ident: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            name: String::new(),
            latitude_deg: String::new(),
            longitude_deg: String::new(),
            start_ident: Some(start_ident.into()),
        }
    }

    pub fn position(&self) -> Option<Position> {
        Position::from_strs(&self.latitude_deg, &self.longitude_deg)
    }
}

/// An airport row (OurAirports `airports.csv`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    pub ident: String,

    #[serde(default, rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub latitude_deg: String,

    #[serde(default)]
    pub longitude_deg: String,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub elevation_ft: Option<i32>,

    #[serde(default)]
    pub iso_country: String,

    #[serde(default)]
    pub municipality: String,

    #[serde(default)]
    pub iata_code: String,
}

impl AirportRecord {
    pub fn new(ident: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Self {
            ident: ident.into(),
            kind: String::new(),
            name: name.into(),
            latitude_deg: position.latitude.to_string(),
            longitude_deg: position.longitude.to_string(),
            elevation_ft: None,
            iso_country: String::new(),
            municipality: String::new(),
            iata_code: String::new(),
        }
    }

    pub fn position(&self) -> Option<Position> {
        Position::from_strs(&self.latitude_deg, &self.longitude_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_position() {
        let rec = NavRecord::new("GOLD", 10.5, -3.25);
        assert_eq!(rec.position(), Some(Position::new(10.5, -3.25)));
    }

    #[test]
    fn airway_has_no_position() {
        let rec = NavRecord::airway("UL9", "KENET");
        assert_eq!(rec.position(), None);
        assert_eq!(rec.start_ident.as_deref(), Some("KENET"));
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let rec: NavRecord = serde_json::from_value(json!({
            "ident": "BPK",
            "latitude_deg": "51.7497",
            "longitude_deg": "-0.106667",
        }))
        .unwrap();
        assert_eq!(rec.name, "");
        assert_eq!(rec.start_ident, None);
        assert!(rec.position().is_some());
    }

    #[test]
    fn airport_type_field_renamed() {
        let apt: AirportRecord = serde_json::from_value(json!({
            "ident": "EGLL",
            "type": "large_airport",
            "name": "London Heathrow Airport",
            "latitude_deg": "51.4706",
            "longitude_deg": "-0.461941",
            "elevation_ft": 83,
        }))
        .unwrap();
        assert_eq!(apt.kind, "large_airport");
        assert_eq!(apt.elevation_ft, Some(83));
    }
}
