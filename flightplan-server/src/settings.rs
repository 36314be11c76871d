//! User settings stored as a JSON file.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Errors reading or writing the settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed settings file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Pilot identity used by exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotSettings {
    pub name: String,
    /// Home base, appended to the name on some filing forms.
    pub base: String,
}

impl Default for PilotSettings {
    fn default() -> Self {
        Self {
            name: "ENTER YOUR NAME".to_string(),
            base: "BASE".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pilot: PilotSettings,

    /// Ids of the exporters run for each posted plan, e.g. `"vatsim"`.
    pub exporters: Vec<String>,
}

impl Settings {
    /// Load settings from `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings from `path`, writing the defaults there first if the
    /// file does not exist yet so they can be edited.
    pub fn load_or_init(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        let settings = Self::default();
        settings.save(path)?;
        info!(path = %path.display(), "wrote default settings");
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let io_error = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        std::fs::write(path, content).map_err(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path().join("settings.json")).unwrap();

        assert_eq!(settings.pilot.name, "ENTER YOUR NAME");
        assert_eq!(settings.pilot.base, "BASE");
        assert!(settings.exporters.is_empty());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"pilot": {"name": "Jane Doe"}}"#).unwrap();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.pilot.name, "Jane Doe");
        assert_eq!(settings.pilot.base, "BASE");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Json { .. })
        ));
    }

    #[test]
    fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = Settings::load_or_init(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());

        std::fs::write(&path, r#"{"exporters": ["vatsim"]}"#).unwrap();
        let settings = Settings::load_or_init(&path).unwrap();
        assert_eq!(settings.exporters, vec!["vatsim".to_string()]);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            pilot: PilotSettings {
                name: "Jane Doe".into(),
                base: "EGLL".into(),
            },
            exporters: vec!["vatsim".into(), "vpilot".into()],
        };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
