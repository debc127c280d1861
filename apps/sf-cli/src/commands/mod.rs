pub mod food;
pub mod goal;
pub mod nav;
pub mod record;
pub mod system;

use std::sync::Arc;
use std::time::Duration;

use sf_api::{ServiceClient, ServiceError};
use sf_goal::{GoalManager, KeyValueStore};

/// Everything a command needs, built once in main.
pub struct Context {
    pub client: Arc<ServiceClient>,
    pub goals: GoalManager,
    pub session: Arc<dyn KeyValueStore>,
    /// How long to wait for a pending goal check before exiting.
    pub settle_timeout: Duration,
}

/// Lead with the user-facing message; keep the machine message as the cause.
pub(crate) fn user_facing(err: ServiceError) -> anyhow::Error {
    let message = err.user_message().to_string();
    anyhow::Error::new(err).context(message)
}
