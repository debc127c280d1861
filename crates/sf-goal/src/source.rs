// source.rs - The authoritative side of goal reconciliation.

use async_trait::async_trait;
use sf_api::{ApiError, GoalInput, GoalRecord, ServiceClient, ServiceError};

/// Where the authoritative goal comes from.
///
/// `fetch_goal` must keep failures distinct from absence: `Ok(None)` means
/// the source says there is no goal, `Err` means it could not be asked.
#[async_trait]
pub trait GoalSource: Send + Sync {
    async fn fetch_goal(&self) -> Result<Option<GoalRecord>, ApiError>;

    async fn submit_goal(&self, input: &GoalInput) -> Result<GoalRecord, ServiceError>;
}

#[async_trait]
impl GoalSource for ServiceClient {
    async fn fetch_goal(&self) -> Result<Option<GoalRecord>, ApiError> {
        self.try_goal().await
    }

    async fn submit_goal(&self, input: &GoalInput) -> Result<GoalRecord, ServiceError> {
        self.set_goal(input).await
    }
}
