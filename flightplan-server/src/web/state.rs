//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::navdata::NavSource;
use crate::plan::Plan;
use crate::route::EnrichConfig;
use crate::schema::Schemas;
use crate::settings::Settings;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Navigation data provider
    pub navdata: Arc<NavSource>,

    /// Plan and waypoint schemas
    pub schemas: Arc<Schemas>,

    /// Pilot defaults and enabled exporters
    pub settings: Arc<Settings>,

    /// Enrichment configuration
    pub enrich: Arc<EnrichConfig>,

    /// The most recently posted plan
    pub active_plan: Arc<RwLock<Option<Plan>>>,
}

impl AppState {
    /// Create a new app state with no active plan.
    pub fn new(
        navdata: NavSource,
        schemas: Schemas,
        settings: Settings,
        enrich: EnrichConfig,
    ) -> Self {
        Self {
            navdata: Arc::new(navdata),
            schemas: Arc::new(schemas),
            settings: Arc::new(settings),
            enrich: Arc::new(enrich),
            active_plan: Arc::new(RwLock::new(None)),
        }
    }
}
