//! Configuration loading for presentation-layer consumers.
//!
//! The dashboard UI polls `/api/config` once at startup and keeps its own
//! endpoint pattern overrides in local storage. Whenever either side changes
//! the merged view is recomputed with the pure merge in [`crate::patterns`];
//! a failed load always resolves to an explicit error state rather than
//! hanging unresolved.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::DashboardConfig;
use crate::model::Job;
use crate::patterns::{merge_endpoint_patterns, render_endpoints, EndpointPatternOverride};

/// The observable state of the server configuration on the client side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<DashboardConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub loaded: bool,
}

impl ConfigState {
    pub fn loaded(config: DashboardConfig) -> Self {
        Self {
            config: Some(config),
            error: None,
            loaded: true,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            config: None,
            error: Some(message.into()),
            loaded: false,
        }
    }

    /// Server patterns merged with user-local overrides. Called whenever
    /// either input changes.
    pub fn endpoint_patterns(
        &self,
        overrides: &[EndpointPatternOverride],
    ) -> BTreeMap<String, String> {
        let server = self
            .config
            .as_ref()
            .map(|config| config.endpoint_path_patterns.clone())
            .unwrap_or_default();
        merge_endpoint_patterns(&server, overrides)
    }

    /// Per-job clickable links, resolved from the merged pattern set.
    pub fn job_links(
        &self,
        job: &Job,
        overrides: &[EndpointPatternOverride],
    ) -> BTreeMap<String, String> {
        render_endpoints(&self.endpoint_patterns(overrides), job)
    }
}

pub struct DashboardClient {
    base_url: String,
    client: Client,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Fetch the server configuration. Any failure collapses into the
    /// `{ error, loaded: false }` fallback state.
    pub async fn load_config(&self) -> ConfigState {
        let url = format!("{}/api/config", self.base_url.trim_end_matches('/'));
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return ConfigState::failed(e.to_string()),
        };
        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => return ConfigState::failed(e.to_string()),
        };
        match response.json::<DashboardConfig>().await {
            Ok(config) => ConfigState::loaded(config),
            Err(e) => ConfigState::failed(e.to_string()),
        }
    }
}
