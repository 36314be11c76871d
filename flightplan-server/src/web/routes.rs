//! HTTP route handlers.

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::export::{Export, Exporter};
use crate::navdata::NavDataProvider;
use crate::parser::ParseContext;
use crate::plan::{Plan, PlanError};
use crate::route::EnrichConfig;
use crate::settings::Settings;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/plan", get(get_plan).post(post_plan).patch(update_plan))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse, enrich and export a submitted plan, and make it the active plan.
async fn post_plan(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PostPlanResponse>, AppError> {
    let req: PostPlanRequest = parse_json(&body)?;
    let ctx = ParseContext::new(&state.schemas);

    let mut plan = Plan::create(&req.plan, &ctx)?;
    let mut secondary_plan = req
        .secondary_plan
        .as_ref()
        .map(|raw| Plan::create(raw, &ctx))
        .transpose()?;

    if let Some(secondary) = &secondary_plan {
        plan.adopt_alternate_from(secondary);
    }

    let navdata = state.navdata.as_ref();
    let config = state.enrich.as_ref();
    futures::join!(populate(&mut plan, navdata, config), async {
        if let Some(secondary) = secondary_plan.as_mut() {
            populate(secondary, navdata, config).await;
        }
    });

    let (exports, export_errors) = export_all(&plan, &state.settings);

    *state.active_plan.write().await = Some(plan.clone());
    info!(
        callsign = plan.get_str("callsign").unwrap_or_default(),
        exports = exports.len(),
        export_errors = export_errors.len(),
        "plan activated"
    );

    Ok(Json(PostPlanResponse {
        plan,
        secondary_plan,
        exports,
        export_errors,
    }))
}

/// The active plan.
async fn get_plan(State(state): State<AppState>) -> Result<Json<Plan>, AppError> {
    let active = state.active_plan.read().await;
    active.as_ref().cloned().map(Json).ok_or_else(no_active_plan)
}

/// Merge fields into the active plan.
async fn update_plan(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<UpdatePlanResponse>, AppError> {
    let raw: Map<String, Value> = parse_json(&body)?;
    let ctx = ParseContext::new(&state.schemas);

    let (mut plan, diagnostics) = {
        let mut active = state.active_plan.write().await;
        let plan = active.as_mut().ok_or_else(no_active_plan)?;
        let diagnostics = plan.update(&raw, &ctx)?;
        (plan.clone(), diagnostics)
    };

    // Lookups run without the lock; the result is stored only if no other
    // request replaced or updated the plan meanwhile.
    populate(&mut plan, state.navdata.as_ref(), &state.enrich).await;

    let mut active = state.active_plan.write().await;
    match active.as_mut() {
        Some(current) if current.is_same_revision(&plan) => *current = plan.clone(),
        _ => debug!("active plan changed during update, result not stored"),
    }

    Ok(Json(UpdatePlanResponse { plan, diagnostics }))
}

async fn populate<P: NavDataProvider>(plan: &mut Plan, provider: &P, config: &EnrichConfig) {
    plan.enrich_route(provider, config).await;
    plan.attach_airport_data(provider, config).await;
}

/// Run every exporter enabled in settings. Unknown ids are skipped.
fn export_all(
    plan: &Plan,
    settings: &Settings,
) -> (BTreeMap<String, Export>, BTreeMap<String, String>) {
    let mut exports = BTreeMap::new();
    let mut errors = BTreeMap::new();

    for id in &settings.exporters {
        let Some(exporter) = Exporter::from_id(id) else {
            warn!(id = %id, "unknown exporter in settings");
            continue;
        };

        match exporter.render(plan, settings) {
            Ok(export) => {
                exports.insert(id.clone(), export);
            }
            Err(e) => {
                warn!(exporter = exporter.name(), error = %e, "export failed");
                errors.insert(exporter.name().to_string(), e.to_string());
            }
        }
    }

    (exports, errors)
}

fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(body), "rejected request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

fn no_active_plan() -> AppError {
    AppError::NotFound {
        message: "No active plan".to_string(),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unprocessable { field: String, message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        AppError::Unprocessable {
            field: e.field().to_string(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, field) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message, None),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message, None),
            AppError::Unprocessable { field, message } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, Some(field))
            }
        };

        warn!(%status, error = %error, "request rejected");

        (status, Json(ErrorResponse { error, field })).into_response()
    }
}
