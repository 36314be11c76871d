//! The provider selected at startup.

use super::NavDataProvider;
use super::cache::CachedNavData;
use super::client::NavClient;
use super::database::NavDatabase;
use super::error::NavError;
use super::types::{AirportRecord, NavRecord};

/// Local CSV tables or a cached remote service.
pub enum NavSource {
    Local(NavDatabase),
    Remote(CachedNavData<NavClient>),
}

impl NavSource {
    pub fn describe(&self) -> &'static str {
        match self {
            NavSource::Local(_) => "local",
            NavSource::Remote(_) => "remote",
        }
    }
}

impl From<NavDatabase> for NavSource {
    fn from(db: NavDatabase) -> Self {
        NavSource::Local(db)
    }
}

impl NavDataProvider for NavSource {
    async fn airport(&self, ident: &str) -> Result<Option<AirportRecord>, NavError> {
        match self {
            NavSource::Local(db) => db.airport(ident).await,
            NavSource::Remote(client) => client.airport(ident).await,
        }
    }

    async fn navaid(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        match self {
            NavSource::Local(db) => db.navaid(ident).await,
            NavSource::Remote(client) => client.navaid(ident).await,
        }
    }

    async fn fix_or_waypoint(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        match self {
            NavSource::Local(db) => db.fix_or_waypoint(ident).await,
            NavSource::Remote(client) => client.fix_or_waypoint(ident).await,
        }
    }

    async fn low_airway(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        match self {
            NavSource::Local(db) => db.low_airway(ident).await,
            NavSource::Remote(client) => client.low_airway(ident).await,
        }
    }

    async fn high_airway(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        match self {
            NavSource::Local(db) => db.high_airway(ident).await,
            NavSource::Remote(client) => client.high_airway(ident).await,
        }
    }
}
