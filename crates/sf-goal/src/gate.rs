// gate.rs - Pre-navigation check that sends users without a goal to setup.
//
// Routes opt out with `requires_goal = false`. For the rest, an undecided
// status triggers GoalManager::initialize(); a decided one is used as is.
// When the gate redirects, the intended path (unless it is the root) is kept
// in the session store so setup can send the user back afterwards.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::manager::GoalManager;
use crate::state::GoalStatus;
use crate::storage::KeyValueStore;

pub const RETURN_URL_KEY: &str = "smartfood_return_url";
pub const GOAL_SETUP_ROUTE: &str = "/goal";

/// Per-route navigation metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    #[serde(default = "default_requires_goal")]
    pub requires_goal: bool,
}

impl Default for RouteMeta {
    fn default() -> Self {
        Self {
            requires_goal: default_requires_goal(),
        }
    }
}

impl RouteMeta {
    /// A route anyone may open, goal or not.
    pub fn public() -> Self {
        Self {
            requires_goal: false,
        }
    }
}

fn default_requires_goal() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    /// Go to `to` instead; `redirect` is where the user was heading.
    Redirect {
        to: String,
        redirect: Option<String>,
    },
}

pub struct NavigationGate {
    goals: GoalManager,
    session: Arc<dyn KeyValueStore>,
    setup_route: String,
}

impl NavigationGate {
    pub fn new(goals: GoalManager, session: Arc<dyn KeyValueStore>) -> Self {
        Self {
            goals,
            session,
            setup_route: GOAL_SETUP_ROUTE.to_string(),
        }
    }

    pub fn with_setup_route(mut self, route: impl Into<String>) -> Self {
        self.setup_route = route.into();
        self
    }

    /// Decide whether navigation to `full_path` may go ahead.
    pub async fn before_each(&self, full_path: &str, meta: &RouteMeta) -> NavigationDecision {
        if !meta.requires_goal {
            return NavigationDecision::Proceed;
        }

        let has_goal = match self.goals.status() {
            GoalStatus::Unknown => self.goals.initialize().await,
            status => status == GoalStatus::Set,
        };
        if has_goal {
            return NavigationDecision::Proceed;
        }

        let redirect = (full_path != "/").then(|| full_path.to_string());
        if let Some(path) = &redirect {
            if let Err(e) = self.session.set(RETURN_URL_KEY, path) {
                warn!(path = %path, error = %e, "failed to remember return path");
            }
        }
        info!(path = full_path, to = %self.setup_route, "no goal set, redirecting to goal setup");
        NavigationDecision::Redirect {
            to: self.setup_route.clone(),
            redirect,
        }
    }

    /// The remembered destination, removed from the session on read.
    pub fn take_return_url(&self) -> Option<String> {
        let path = match self.session.get(RETURN_URL_KEY) {
            Ok(path) => path?,
            Err(e) => {
                warn!(error = %e, "failed to read return path");
                return None;
            }
        };
        if let Err(e) = self.session.remove(RETURN_URL_KEY) {
            warn!(error = %e, "failed to clear return path");
        }
        Some(path)
    }
}
