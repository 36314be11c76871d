use std::error::Error;

use flightplan_server::config::ServerConfig;
use flightplan_server::navdata::{
    CachedNavData, NavCacheConfig, NavClient, NavClientConfig, NavDatabase, NavSource,
    fetch_ourairports,
};
use flightplan_server::schema::Schemas;
use flightplan_server::settings::Settings;
use flightplan_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env()?;

    match std::env::args().nth(1).as_deref() {
        Some("fetch-navdata") => {
            let rows = fetch_ourairports(&config.navdata_dir, &reqwest::Client::new()).await?;
            info!(rows, dir = %config.navdata_dir.display(), "navigation data fetched");
            Ok(())
        }
        Some(other) => Err(format!("unknown command {other:?}; expected fetch-navdata").into()),
        None => serve(config).await,
    }
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn Error>> {
    let navdata = match &config.navdata_url {
        Some(url) => {
            let client = NavClient::new(NavClientConfig::new(url))?;
            NavSource::Remote(CachedNavData::new(client, &NavCacheConfig::default()))
        }
        None => NavSource::Local(NavDatabase::load_dir(&config.navdata_dir)?),
    };
    info!(source = navdata.describe(), "navigation data ready");

    let settings = Settings::load_or_init(&config.settings_path)?;
    let schemas = Schemas::standard()?;

    let state = AppState::new(navdata, schemas, settings, config.enrich_config());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, "flight plan server listening");
    info!("  GET   /health  - Health check");
    info!("  POST  /plan    - Submit a flight plan");
    info!("  GET   /plan    - Active flight plan");
    info!("  PATCH /plan    - Update the active flight plan");

    axum::serve(listener, app).await?;
    Ok(())
}
