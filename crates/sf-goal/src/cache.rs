// cache.rs - Durable mirror of the goal under two independent keys.
//
// The flag key says whether a goal was confirmed; the payload key holds the
// goal itself. Keeping them apart makes a stale flag over a missing or
// corrupt payload detectable: such a cache counts as "not set".
//
// The payload is written before the flag, and the flag only if the payload
// write succeeded. Storage failures are logged and absorbed; the cache is an
// accelerator, never a source of errors.

use std::sync::Arc;

use sf_api::GoalRecord;
use tracing::warn;

use crate::storage::KeyValueStore;

pub const GOAL_SET_KEY: &str = "smartfood_goal_set";
pub const GOAL_DATA_KEY: &str = "smartfood_goal_data";

#[derive(Clone)]
pub struct GoalCache {
    store: Arc<dyn KeyValueStore>,
}

impl GoalCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Whether the flag key reads exactly `"true"`.
    pub fn is_flag_set(&self) -> bool {
        match self.store.get(GOAL_SET_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!("failed to read goal flag from storage: {}", e);
                false
            }
        }
    }

    /// The cached goal payload, if present and parseable.
    pub fn load(&self) -> Option<GoalRecord> {
        let json = match self.store.get(GOAL_DATA_KEY) {
            Ok(json) => json?,
            Err(e) => {
                warn!("failed to read goal data from storage: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(goal) => Some(goal),
            Err(e) => {
                warn!("cached goal data is unreadable, ignoring it: {}", e);
                None
            }
        }
    }

    /// The cached goal, but only when the flag and the payload agree.
    pub fn load_confirmed(&self) -> Option<GoalRecord> {
        if !self.is_flag_set() {
            return None;
        }
        self.load()
    }

    /// Persist `goal` and then raise the flag.
    pub fn save(&self, goal: &GoalRecord) {
        let json = match serde_json::to_string(goal) {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to serialize goal for storage: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(GOAL_DATA_KEY, &json) {
            warn!("failed to save goal data to storage: {}", e);
            return;
        }
        if let Err(e) = self.store.set(GOAL_SET_KEY, "true") {
            warn!("failed to save goal status to storage: {}", e);
        }
    }

    /// Drop both keys.
    pub fn clear(&self) {
        for key in [GOAL_SET_KEY, GOAL_DATA_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("failed to clear {} from storage: {}", key, e);
            }
        }
    }
}
