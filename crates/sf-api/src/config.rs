//! Client configuration structures

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the service lives and how long bounded requests may take.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deadline for bounded requests, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Static address file read by `ServiceClient::ip_config`.
    #[serde(default = "default_ip_config_path")]
    pub ip_config_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            ip_config_path: default_ip_config_path(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with every other field defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

// Serde default functions
fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_ip_config_path() -> PathBuf {
    PathBuf::from("ip-config.json")
}
