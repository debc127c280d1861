// config.rs - smartfood.toml: client and goal settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sf_api::ClientConfig;
use sf_goal::GoalConfig;
use tracing::{info, warn};

/// Overrides `client.base_url` when set.
pub const API_URL_ENV: &str = "SMARTFOOD_API_URL";

/// Top-level configuration from smartfood.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Service location and request timeout
    #[serde(default)]
    pub client: ClientConfig,

    /// Goal cache and decision deadline
    #[serde(default)]
    pub goal: GoalConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config, falling back to defaults if the file is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    warn!("ignoring unreadable config {}: {}", path.display(), e);
                }
                Self::default()
            }
        }
    }

    /// Apply `SMARTFOOD_API_URL` from the environment.
    pub fn apply_env(&mut self) {
        self.override_base_url(std::env::var(API_URL_ENV).ok());
    }

    fn override_base_url(&mut self, base_url: Option<String>) {
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            info!("{} set, using service at {}", API_URL_ENV, url);
            self.client.base_url = url;
        }
    }

    /// Session-scoped keys (the post-setup return path) live next to the goal cache.
    pub fn session_path(&self) -> PathBuf {
        self.goal.store_path.with_file_name("session.json")
    }
}
