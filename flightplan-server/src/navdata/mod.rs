//! Navigation data providers.
//!
//! Every lookup is keyed by identifier and may return zero, one or many
//! records, since identifiers repeat across the world's navigation network.
//! Providers are read-only and shared between concurrent requests.

mod cache;
mod client;
mod database;
mod error;
mod fetch;
mod source;
mod types;

use std::future::Future;

pub use cache::{CachedNavData, NavCacheConfig};
pub use client::{NavClient, NavClientConfig};
pub use database::{NavDatabase, NavTable};
pub use error::NavError;
pub use fetch::{OURAIRPORTS_FILES, fetch_ourairports};
pub use source::NavSource;
pub use types::{AirportRecord, NavRecord};

/// Identifier-keyed navigation lookups.
///
/// Implementations must be safe to query concurrently. The returned futures
/// are `Send` so lookups can run inside spawned request handlers.
pub trait NavDataProvider: Send + Sync {
    /// Look up an airport by ICAO identifier.
    fn airport(
        &self,
        ident: &str,
    ) -> impl Future<Output = Result<Option<AirportRecord>, NavError>> + Send;

    /// Radio navigation aids with this identifier.
    fn navaid(&self, ident: &str) -> impl Future<Output = Result<Vec<NavRecord>, NavError>> + Send;

    /// Named fixes and waypoints with this identifier.
    fn fix_or_waypoint(
        &self,
        ident: &str,
    ) -> impl Future<Output = Result<Vec<NavRecord>, NavError>> + Send;

    /// Low-altitude airway segments with this identifier.
    fn low_airway(
        &self,
        ident: &str,
    ) -> impl Future<Output = Result<Vec<NavRecord>, NavError>> + Send;

    /// High-altitude airway segments with this identifier.
    fn high_airway(
        &self,
        ident: &str,
    ) -> impl Future<Output = Result<Vec<NavRecord>, NavError>> + Send;
}
