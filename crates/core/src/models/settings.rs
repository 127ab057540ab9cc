use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

/// Base URL of the forecasting service when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Client configuration, stored as JSON next to the session document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the forecasting HTTP API (no trailing slash needed).
    pub api_base_url: String,

    /// Upper bound for any single request, in seconds.
    pub request_timeout_secs: u64,

    /// How long the product form shows its confirmation before clearing, in ms.
    pub form_reset_delay_ms: u64,

    /// Simulated latency of the static market-trends source, in ms.
    pub trends_latency_ms: u64,

    /// Where the durable session document lives. `None` keeps it in memory.
    pub storage_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            form_reset_delay_ms: 3000,
            trends_latency_ms: 1500,
            storage_path: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&self, path: &str) -> Result<(), CoreError> {
        self.validate()?;
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reject configurations that could never issue a request.
    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::ValidationError(format!(
                "Invalid API base URL '{url}': must start with http:// or https://"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::ValidationError(
                "Request timeout must be at least one second".into(),
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn form_reset_delay(&self) -> Duration {
        Duration::from_millis(self.form_reset_delay_ms)
    }

    pub fn trends_latency(&self) -> Duration {
        Duration::from_millis(self.trends_latency_ms)
    }
}
