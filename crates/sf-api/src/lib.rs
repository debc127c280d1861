//! # sf-api
//!
//! Request layer and typed client for the SmartFood service.
//!
//! Every call goes through [`RequestExecutor`], which bounds the exchange
//! with a deadline and classifies each failure into exactly one
//! [`ApiError`] kind (timeout, network, server, validation, unknown).
//! [`ServiceClient`] builds the endpoint catalogue on top of it.
//!
//! ## Key components
//!
//! - [`RequestExecutor`] - deadline-bounded exchange with failure classification
//! - [`classify`] - the single ordered classification function
//! - [`ServiceClient`] - analyze, records, balance, progress, goals, foods, system
//! - [`ClientConfig`] - base URL, default timeout, static address file

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod types;

pub use client::ServiceClient;
pub use config::ClientConfig;
pub use error::{classify, ApiError, ErrorKind, FailureSignal, ServiceError};
pub use executor::{Deadline, RawResponse, RequestExecutor};
pub use types::{
    AnalyzeImageResponse, ApiErrorResponse, CategoryInfo, CreateRecordRequest,
    DailyBalanceResponse, FoodItemInfo, FoodsByCategoryResponse, GoalInput, GoalRecord, IpConfig,
    LocalIpResponse, MealRecordResponse, PortionOption, ProgressDataPoint, ProgressRange,
    ProgressResponse, SuggestionItem,
};
