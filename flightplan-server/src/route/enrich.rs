//! Waypoint enrichment.
//!
//! Resolves each waypoint of a route against a navigation data provider, in
//! route order. Each resolution may depend on the last waypoint that gained
//! a position, so lookups for one route are strictly sequential.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::geo::{Position, parse_track};
use crate::navdata::{NavDataProvider, NavError, NavRecord};

use super::{Route, Waypoint, WaypointKind};

/// Route marker for a direct leg between the neighbouring points.
pub const DIRECT_MARKER: &str = "DCT";

/// Default timeout for a single provider query.
const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Configuration for route enrichment.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Bound on each provider query. A query that exceeds it counts as
    /// returning no candidates.
    pub query_timeout: Duration,
}

impl EnrichConfig {
    pub fn new(query_timeout: Duration) -> Self {
        Self { query_timeout }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_TIMEOUT)
    }
}

/// Resolution sources, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Fix,
    Navaid,
    Track,
    LowAirway,
    HighAirway,
}

impl Source {
    const PRIORITY: [Source; 5] = [
        Source::Fix,
        Source::Navaid,
        Source::Track,
        Source::LowAirway,
        Source::HighAirway,
    ];

    fn kind(self) -> WaypointKind {
        match self {
            Source::Fix => WaypointKind::Fix,
            Source::Navaid => WaypointKind::Navaid,
            Source::Track => WaypointKind::Track,
            Source::LowAirway => WaypointKind::Airway,
            Source::HighAirway => WaypointKind::HighAirway,
        }
    }
}

/// The most recent waypoint with a position.
#[derive(Debug, Clone)]
struct LastKnown {
    name: String,
    position: Position,
}

/// Resolve every waypoint of `route` in place.
///
/// Waypoints that already carry a `kind` are left as they are but still
/// serve as positional context, so a route can be enriched again after
/// part of a plan changes.
///
/// After this returns every waypoint has a `kind`. Waypoints no source could
/// resolve are marked unresolved; provider failures and timeouts count as
/// "no candidates" and never abort the pass. If the future is dropped part
/// way, already-resolved waypoints keep their state.
pub async fn enrich<P: NavDataProvider>(route: &mut Route, provider: &P, config: &EnrichConfig) {
    let mut last_known: Option<LastKnown> = None;

    for waypoint in route.waypoints_mut() {
        if !waypoint.is_enriched() {
            resolve(waypoint, last_known.as_ref(), provider, config).await;
        }

        if let Some(position) = waypoint.position {
            last_known = Some(LastKnown {
                name: waypoint.name.clone(),
                position,
            });
        }
    }

    let unresolved = route.unresolved().count();
    if unresolved > 0 {
        info!(
            waypoints = route.len(),
            unresolved, "route enriched with unresolved waypoints"
        );
    } else {
        debug!(waypoints = route.len(), "route enriched");
    }
}

async fn resolve<P: NavDataProvider>(
    waypoint: &mut Waypoint,
    last_known: Option<&LastKnown>,
    provider: &P,
    config: &EnrichConfig,
) {
    if waypoint.name.eq_ignore_ascii_case(DIRECT_MARKER) {
        waypoint.kind = Some(WaypointKind::Direct);
        return;
    }

    // Coordinates supplied with the submission are taken as given.
    if waypoint.position.is_some() {
        waypoint.kind = Some(WaypointKind::Fix);
        return;
    }

    for source in Source::PRIORITY {
        let candidates = lookup(source, &waypoint.name, provider, config).await;
        if candidates.is_empty() {
            continue;
        }

        waypoint.kind = Some(source.kind());
        if source.kind().is_airway() {
            // Airways name a leg, not a point.
            let chosen = choose_by_continuity(&candidates, last_known);
            debug!(
                ident = %waypoint.name,
                start = ?chosen.and_then(|c| c.start_ident.as_deref()),
                "resolved airway"
            );
            return;
        }

        if let Some(chosen) = choose_nearest(&candidates, last_known) {
            waypoint.position = chosen.position();
        }
        return;
    }

    debug!(ident = %waypoint.name, "waypoint unresolved");
    waypoint.kind = Some(WaypointKind::Unresolved);
    waypoint.unresolved = true;
}

/// Query one source; failures and timeouts yield no candidates.
async fn lookup<P: NavDataProvider>(
    source: Source,
    ident: &str,
    provider: &P,
    config: &EnrichConfig,
) -> Vec<NavRecord> {
    let query = async {
        match source {
            Source::Fix => provider.fix_or_waypoint(ident).await,
            Source::Navaid => provider.navaid(ident).await,
            Source::LowAirway => provider.low_airway(ident).await,
            Source::HighAirway => provider.high_airway(ident).await,
            Source::Track => Ok::<_, NavError>(
                parse_track(ident)
                    .map(|p| NavRecord::new(ident, p.latitude, p.longitude))
                    .into_iter()
                    .collect(),
            ),
        }
    };

    match tokio::time::timeout(config.query_timeout, query).await {
        Ok(Ok(records)) => records,
        Ok(Err(e)) => {
            warn!(ident, source = ?source, error = %e, "navigation lookup failed");
            Vec::new()
        }
        Err(_) => {
            warn!(ident, source = ?source, timeout = ?config.query_timeout, "navigation lookup timed out");
            Vec::new()
        }
    }
}

/// Prefer the segment starting at the previous waypoint, else the first.
fn choose_by_continuity<'a>(
    candidates: &'a [NavRecord],
    last_known: Option<&LastKnown>,
) -> Option<&'a NavRecord> {
    last_known
        .and_then(|last| {
            candidates
                .iter()
                .find(|c| c.start_ident.as_deref() == Some(last.name.as_str()))
        })
        .or_else(|| candidates.first())
}

/// The candidate nearest `last_known` by planar distance, else the first.
///
/// Candidates without a position rank last. Ties keep the earlier candidate.
fn choose_nearest<'a>(
    candidates: &'a [NavRecord],
    last_known: Option<&LastKnown>,
) -> Option<&'a NavRecord> {
    let Some(last) = last_known else {
        return candidates.first();
    };
    if candidates.len() == 1 {
        return candidates.first();
    }

    let distance = |c: &NavRecord| {
        c.position()
            .map_or(f64::INFINITY, |p| p.planar_distance(&last.position))
    };

    let mut best = candidates.first()?;
    let mut best_distance = distance(best);
    for candidate in &candidates[1..] {
        let d = distance(candidate);
        if d < best_distance {
            best = candidate;
            best_distance = d;
        }
    }
    Some(best)
}
