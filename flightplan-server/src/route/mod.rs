//! Routes and waypoints.
//!
//! A [`Route`] is produced by the tokenizer with bare waypoint stubs and is
//! later resolved in place by the enrichment engine. Waypoint order is the
//! flight-path order and is never changed.

mod enrich;
mod tokenize;

use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::geo::Position;

pub use enrich::{DIRECT_MARKER, EnrichConfig, enrich};
pub use tokenize::{RouteInput, Tokenized, tokenize};

/// What a waypoint identifier resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    Fix,
    Navaid,
    Airway,
    HighAirway,
    Track,
    Direct,
    Unresolved,
}

impl WaypointKind {
    /// Whether identifiers of this kind name a leg rather than a point.
    pub fn is_airway(&self) -> bool {
        matches!(self, WaypointKind::Airway | WaypointKind::HighAirway)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WaypointKind::Fix => "fix",
            WaypointKind::Navaid => "navaid",
            WaypointKind::Airway => "airway",
            WaypointKind::HighAirway => "high_airway",
            WaypointKind::Track => "track",
            WaypointKind::Direct => "direct",
            WaypointKind::Unresolved => "unresolved",
        }
    }

    /// Look up a kind by its serialized name.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            WaypointKind::Fix,
            WaypointKind::Navaid,
            WaypointKind::Airway,
            WaypointKind::HighAirway,
            WaypointKind::Track,
            WaypointKind::Direct,
            WaypointKind::Unresolved,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == name)
    }
}

/// One element of a route.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Waypoint {
    pub name: String,

    #[serde(flatten)]
    pub position: Option<Position>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<i64>,

    /// Set by enrichment; `None` until then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<WaypointKind>,

    /// Set by enrichment when no source resolved the identifier. Always
    /// matches a `kind` of [`WaypointKind::Unresolved`], which is what
    /// serialized records carry.
    #[serde(skip)]
    pub unresolved: bool,
}

impl Waypoint {
    /// A stub with only the identifier set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
            altitude: None,
            speed: None,
            kind: None,
            unresolved: false,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn latitude(&self) -> Option<f64> {
        self.position.map(|p| p.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.position.map(|p| p.longitude)
    }

    pub fn is_enriched(&self) -> bool {
        self.kind.is_some()
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An ordered sequence of waypoints.
///
/// When the submitted route produced no waypoints (an empty or blank
/// string), the original text is kept so it can be echoed back verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    waypoints: Vec<Waypoint>,
    verbatim: Option<String>,
}

impl Route {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            waypoints,
            verbatim: None,
        }
    }

    /// Split a route string on whitespace into waypoint stubs.
    pub fn from_text(text: &str) -> Self {
        let waypoints: Vec<Waypoint> = text.split_whitespace().map(Waypoint::new).collect();
        let verbatim = waypoints.is_empty().then(|| text.to_string());
        Self {
            waypoints,
            verbatim,
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn waypoints_mut(&mut self) -> &mut [Waypoint] {
        &mut self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint identifiers in route order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.waypoints.iter().map(|w| w.name.as_str())
    }

    /// Waypoints that enrichment could not resolve.
    pub fn unresolved(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter().filter(|w| w.unresolved)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.waypoints.is_empty() {
            return f.write_str(self.verbatim.as_deref().unwrap_or(""));
        }

        for (i, waypoint) in self.waypoints.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{waypoint}")?;
        }
        Ok(())
    }
}

// Waypoint records when there are any, otherwise the verbatim text.
impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (&self.verbatim, self.waypoints.is_empty()) {
            (Some(text), true) => serializer.serialize_str(text),
            _ => {
                let mut seq = serializer.serialize_seq(Some(self.waypoints.len()))?;
                for waypoint in &self.waypoints {
                    seq.serialize_element(waypoint)?;
                }
                seq.end()
            }
        }
    }
}
