//! # sf-goal
//!
//! Goal state for SmartFood: whether the user has set a nutrition goal, and
//! what it is.
//!
//! The answer combines a durable local cache with the service's goal
//! endpoint. A consistent cache answers at once and is verified in the
//! background; otherwise the service is asked under a decision deadline, and
//! a late answer still updates state when it arrives.
//!
//! ## Key components
//!
//! - [`GoalManager`] - the reconciled state, published on a watch channel
//! - [`GoalCache`] - flag + payload mirror of the goal in a [`KeyValueStore`]
//! - [`FileStore`] / [`MemoryStore`] - durable and session-scoped stores
//! - [`GoalSource`] - where authoritative answers come from
//! - [`NavigationGate`] - redirects to goal setup before protected routes

pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod manager;
pub mod source;
pub mod state;
pub mod storage;

#[cfg(test)]
mod testing;

pub use cache::GoalCache;
pub use config::GoalConfig;
pub use error::StorageError;
pub use gate::{NavigationDecision, NavigationGate, RouteMeta};
pub use manager::GoalManager;
pub use source::GoalSource;
pub use state::{GoalState, GoalStatus};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
