//! Geographic positions and coordinate notation.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A point in decimal degrees.
///
/// Latitude and longitude only ever travel together: anything that may or may
/// not have a location holds an `Option<Position>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse a position from decimal-degree strings.
    ///
    /// Returns `None` if either side is empty or not a number. Navigation
    /// records use the empty string for "no coordinate".
    pub fn from_strs(latitude: &str, longitude: &str) -> Option<Self> {
        let latitude = latitude.trim();
        let longitude = longitude.trim();
        if latitude.is_empty() || longitude.is_empty() {
            return None;
        }

        let latitude: f64 = latitude.parse().ok()?;
        let longitude: f64 = longitude.parse().ok()?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }

        Some(Self::new(latitude, longitude))
    }

    /// Distance in raw degree deltas.
    ///
    /// This is a flat-plane approximation, not a great-circle distance. It
    /// misranks candidates near the poles and across the antimeridian.
    pub fn planar_distance(&self, other: &Position) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

// Latitude is two-digit degrees, longitude three-digit, each optionally
// followed by minutes and then seconds.
static TRACK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})(\d{2})?(\d{2})?([NS])(\d{3})(\d{2})?(\d{2})?([EW])$")
        .expect("track pattern regex is valid")
});

/// Parse a coordinate-track identifier such as `50N020W`, `5030N02045W`
/// or `503015N0204530W` into a position.
///
/// Returns `None` for anything that is not a literal coordinate, including
/// out-of-range degrees, minutes or seconds.
pub fn parse_track(ident: &str) -> Option<Position> {
    let caps = TRACK_REGEX.captures(ident)?;

    fn component(cap: Option<regex::Match<'_>>) -> Option<u32> {
        match cap {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    }

    fn to_decimal(deg: u32, min: u32, sec: u32, negative: bool, max_deg: u32) -> Option<f64> {
        if min >= 60 || sec >= 60 {
            return None;
        }
        let dd = f64::from(deg) + f64::from(min) / 60.0 + f64::from(sec) / 3600.0;
        if dd > f64::from(max_deg) {
            return None;
        }
        Some(if negative { -dd } else { dd })
    }

    let lat = to_decimal(
        component(caps.get(1))?,
        component(caps.get(2))?,
        component(caps.get(3))?,
        &caps[4] == "S",
        90,
    )?;
    let lon = to_decimal(
        component(caps.get(5))?,
        component(caps.get(6))?,
        component(caps.get(7))?,
        &caps[8] == "W",
        180,
    )?;

    Some(Position::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn from_strs_parses_decimal_degrees() {
        let pos = Position::from_strs("51.4706", "-0.461941").unwrap();
        assert!(approx(pos.latitude, 51.4706));
        assert!(approx(pos.longitude, -0.461941));
    }

    #[test]
    fn from_strs_rejects_empty_or_garbage() {
        assert!(Position::from_strs("", "1.0").is_none());
        assert!(Position::from_strs("1.0", "  ").is_none());
        assert!(Position::from_strs("north", "1.0").is_none());
        assert!(Position::from_strs("NaN", "1.0").is_none());
    }

    #[test]
    fn planar_distance_is_euclidean_in_degrees() {
        let a = Position::new(10.0, 10.0);
        let b = Position::new(13.0, 14.0);
        assert!(approx(a.planar_distance(&b), 5.0));
        assert!(approx(b.planar_distance(&a), 5.0));
    }

    #[test]
    fn track_degrees_only() {
        let pos = parse_track("50N020W").unwrap();
        assert!(approx(pos.latitude, 50.0));
        assert!(approx(pos.longitude, -20.0));
    }

    #[test]
    fn track_degrees_and_minutes() {
        let pos = parse_track("5000N02000W").unwrap();
        assert!(approx(pos.latitude, 50.0));
        assert!(approx(pos.longitude, -20.0));

        let pos = parse_track("5030S02045E").unwrap();
        assert!(approx(pos.latitude, -50.5));
        assert!(approx(pos.longitude, 20.75));
    }

    #[test]
    fn track_with_seconds_applies_sign_to_whole_value() {
        let pos = parse_track("503036S0201800W").unwrap();
        assert!(approx(pos.latitude, -(50.0 + 30.0 / 60.0 + 36.0 / 3600.0)));
        assert!(approx(pos.longitude, -(20.0 + 18.0 / 60.0)));
    }

    #[test]
    fn track_rejects_non_coordinates() {
        assert!(parse_track("GOLD").is_none());
        assert!(parse_track("UL9").is_none());
        assert!(parse_track("50N20W").is_none());
        assert!(parse_track("5000N02000").is_none());
        assert!(parse_track("5000n02000w").is_none());
    }

    #[test]
    fn track_rejects_out_of_range() {
        assert!(parse_track("91N020W").is_none());
        assert!(parse_track("50N181W").is_none());
        assert!(parse_track("5060N02000W").is_none());
    }
}
