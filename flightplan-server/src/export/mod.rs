//! Plan exporters.
//!
//! Each exporter renders a [`Plan`] into the form a downstream client
//! accepts. Delivering the result (opening a browser, writing the file) is
//! left to the caller.

mod vatsim;
mod vpilot;

use serde::Serialize;

use crate::plan::{Plan, PlanError};
use crate::settings::Settings;

/// Errors rendering a plan.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("failed to build URL: {0}")]
    Url(String),

    #[error("failed to write XML: {0}")]
    Xml(String),
}

/// A rendered plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Export {
    /// A URL that pre-files the plan when opened.
    Url { url: String },
    /// A file for the client to import.
    File { file_name: String, contents: String },
}

/// The available exporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exporter {
    Vatsim,
    VPilot,
}

impl Exporter {
    pub const ALL: [Exporter; 2] = [Exporter::Vatsim, Exporter::VPilot];

    /// Identifier used in settings.
    pub fn id(&self) -> &'static str {
        match self {
            Exporter::Vatsim => "vatsim",
            Exporter::VPilot => "vpilot",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Exporter::Vatsim => "Vatsim",
            Exporter::VPilot => "vPilot",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.id() == id)
    }

    pub fn render(&self, plan: &Plan, settings: &Settings) -> Result<Export, ExportError> {
        match self {
            Exporter::Vatsim => vatsim::render(plan, settings),
            Exporter::VPilot => vpilot::render(plan),
        }
    }
}

/// Optional field rendered as text, empty when absent.
fn text(plan: &Plan, key: &str) -> String {
    plan.get(key).map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for exporter in Exporter::ALL {
            assert_eq!(Exporter::from_id(exporter.id()), Some(exporter));
        }
        assert_eq!(Exporter::from_id("msfs"), None);
        assert_eq!(Exporter::VPilot.name(), "vPilot");
    }

    #[test]
    fn export_serializes_tagged() {
        let export = Export::Url {
            url: "https://example.com".into(),
        };
        assert_eq!(
            serde_json::to_value(&export).unwrap(),
            serde_json::json!({"kind": "url", "url": "https://example.com"})
        );
    }
}
