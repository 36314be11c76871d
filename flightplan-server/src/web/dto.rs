//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::export::Export;
use crate::parser::Diagnostic;
use crate::plan::Plan;

/// Body of `POST /plan`.
#[derive(Debug, Deserialize)]
pub struct PostPlanRequest {
    /// Raw plan fields
    pub plan: Map<String, Value>,

    /// A follow-on leg; its destination becomes the alternate if the plan
    /// has none
    #[serde(default)]
    pub secondary_plan: Option<Map<String, Value>>,
}

/// Response to `POST /plan`.
#[derive(Debug, Serialize)]
pub struct PostPlanResponse {
    pub plan: Plan,

    pub secondary_plan: Option<Plan>,

    /// Rendered output keyed by exporter id
    pub exports: BTreeMap<String, Export>,

    /// Failure message keyed by exporter name
    pub export_errors: BTreeMap<String, String>,
}

/// Response to `PATCH /plan`.
#[derive(Debug, Serialize)]
pub struct UpdatePlanResponse {
    pub plan: Plan,

    /// Diagnostics from this update only
    pub diagnostics: Vec<Diagnostic>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Offending field, for rejected plans
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
