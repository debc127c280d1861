//! Goal state configuration structures

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for goal reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    /// How long `initialize()` waits for the service before answering "no goal", in milliseconds.
    #[serde(default = "default_decision_deadline_ms")]
    pub decision_deadline_ms: u64,

    /// Durable key-value file holding the cached goal.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            decision_deadline_ms: default_decision_deadline_ms(),
            store_path: default_store_path(),
        }
    }
}

impl GoalConfig {
    pub fn decision_deadline(&self) -> Duration {
        Duration::from_millis(self.decision_deadline_ms)
    }
}

fn default_decision_deadline_ms() -> u64 {
    3000
}

/// `<data dir>/smartfood/store.json`, or `.smartfood/store.json` when the
/// platform has no data directory.
fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("smartfood"))
        .unwrap_or_else(|| PathBuf::from(".smartfood"))
        .join("store.json")
}
