//! HTTP client for a remote navigation data service.
//!
//! The service exposes one JSON endpoint per table:
//!
//! - `GET {base}/airports/{ident}` returns an airport object, or 404
//! - `GET {base}/navaids/{ident}` returns an array of records
//! - `GET {base}/fixes/{ident}`
//! - `GET {base}/airways/low/{ident}`
//! - `GET {base}/airways/high/{ident}`

use std::sync::Arc;
use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use super::NavDataProvider;
use super::error::NavError;
use super::types::{AirportRecord, NavRecord};

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Configuration for the navigation data client.
#[derive(Debug, Clone)]
pub struct NavClientConfig {
    /// Base URL of the service, e.g. `http://localhost:8080/nav`
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NavClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Remote navigation data client.
///
/// Uses a semaphore to cap concurrent requests against the service.
#[derive(Debug, Clone)]
pub struct NavClient {
    http: reqwest::Client,
    base_url: Url,
    semaphore: Arc<Semaphore>,
}

impl NavClient {
    pub fn new(config: NavClientConfig) -> Result<Self, NavError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| NavError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(NavError::InvalidUrl(config.base_url));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Build the URL for an endpoint, percent-encoding the identifier.
    fn endpoint(&self, path: &[&str], ident: &str) -> Result<Url, NavError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| NavError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(path)
            .push(ident);
        Ok(url)
    }

    /// GET a JSON body; `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, NavError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| NavError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        debug!(%url, "navigation data request");
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NavError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| NavError::Json {
                message: e.to_string(),
            })
    }

    async fn get_records(&self, path: &[&str], ident: &str) -> Result<Vec<NavRecord>, NavError> {
        let url = self.endpoint(path, ident)?;
        Ok(self.get_json(url).await?.unwrap_or_default())
    }
}

impl NavDataProvider for NavClient {
    async fn airport(&self, ident: &str) -> Result<Option<AirportRecord>, NavError> {
        let url = self.endpoint(&["airports"], ident)?;
        self.get_json(url).await
    }

    async fn navaid(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        self.get_records(&["navaids"], ident).await
    }

    async fn fix_or_waypoint(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        self.get_records(&["fixes"], ident).await
    }

    async fn low_airway(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        self.get_records(&["airways", "low"], ident).await
    }

    async fn high_airway(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        self.get_records(&["airways", "high"], ident).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = NavClientConfig::new("http://localhost:9000")
            .with_max_concurrent(3)
            .with_timeout(5);

        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.max_concurrent, 3);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn endpoint_appends_segments() {
        let client = NavClient::new(NavClientConfig::new("http://localhost:9000/nav/")).unwrap();

        let url = client.endpoint(&["airways", "high"], "UL9").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/nav/airways/high/UL9");

        let url = client.endpoint(&["fixes"], "A B/C").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/nav/fixes/A%20B%2FC");
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            NavClient::new(NavClientConfig::new("not a url")),
            Err(NavError::InvalidUrl(_))
        ));
        assert!(matches!(
            NavClient::new(NavClientConfig::new("mailto:nav@example.com")),
            Err(NavError::InvalidUrl(_))
        ));
    }
}
