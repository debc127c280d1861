// error.rs - Classified failures for requests to the SmartFood service.
//
// Every failed request ends up as exactly one ApiError. The kind is decided
// by `classify()`, which inspects the failure signal in a fixed order:
//   abort/timeout → transport failure → status >= 500 → status 404
//     → any other status → unknown
// An error that is already classified passes through unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ApiErrorResponse;

pub const TIMEOUT_USER_MESSAGE: &str =
    "Request timed out. Please check that the backend service is running.";
pub const NETWORK_USER_MESSAGE: &str =
    "Network connection failed. Please check that the backend service is running.";
pub const SERVER_USER_MESSAGE: &str = "Server error. Please try again later.";
pub const REQUEST_FAILED_USER_MESSAGE: &str = "Request failed. Please try again later.";
pub const NOT_FOUND_USER_MESSAGE: &str = "The requested resource does not exist.";
pub const UNKNOWN_USER_MESSAGE: &str = "An unknown error occurred. Please try again.";

/// The closed set of failure kinds a request can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    Network,
    Server,
    Validation,
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::Server => write!(f, "server"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// A classified request failure.
///
/// `message` is meant for logs; `user_message` is the fixed text a front end
/// shows for this kind of failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The deadline elapsed and the in-flight call was aborted.
    #[error("{message}")]
    Timeout {
        message: String,
        user_message: String,
    },

    /// The call failed before any response arrived (connection refused, reset, DNS).
    #[error("{message}")]
    Network {
        message: String,
        user_message: String,
    },

    /// The service answered with a 5xx, or any non-404 error status.
    #[error("{message}")]
    Server {
        message: String,
        user_message: String,
    },

    /// The service answered 404: the addressed resource does not exist.
    #[error("{message}")]
    Validation {
        message: String,
        user_message: String,
    },

    /// Anything that fits none of the above (bad request construction, undecodable body).
    #[error("{message}")]
    Unknown {
        message: String,
        user_message: String,
    },
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Timeout { .. } => ErrorKind::Timeout,
            ApiError::Network { .. } => ErrorKind::Network,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Machine-readable description, for logs.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Timeout { message, .. }
            | ApiError::Network { message, .. }
            | ApiError::Server { message, .. }
            | ApiError::Validation { message, .. }
            | ApiError::Unknown { message, .. } => message,
        }
    }

    /// Text suitable for display to the user.
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Timeout { user_message, .. }
            | ApiError::Network { user_message, .. }
            | ApiError::Server { user_message, .. }
            | ApiError::Validation { user_message, .. }
            | ApiError::Unknown { user_message, .. } => user_message,
        }
    }
}

/// What was observed when a request failed, before classification.
#[derive(Debug, Clone)]
pub enum FailureSignal {
    /// The deadline fired and the call was aborted.
    Aborted,
    /// The transport failed before a response was received.
    Transport(String),
    /// A response arrived with a non-success status.
    Status { status: u16, url: String },
    /// The failure was already classified further down.
    Classified(ApiError),
    /// Anything else.
    Other(String),
}

impl FailureSignal {
    /// Map a reqwest failure onto a signal.
    ///
    /// reqwest reports its own timeouts as `is_timeout()`; those count as an
    /// abort. Builder and decode failures never reached the wire.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            FailureSignal::Aborted
        } else if err.is_builder() || err.is_decode() {
            FailureSignal::Other(err.to_string())
        } else {
            FailureSignal::Transport(err.to_string())
        }
    }
}

/// Turn a failure signal into exactly one classified error.
pub fn classify(signal: FailureSignal) -> ApiError {
    match signal {
        FailureSignal::Aborted => ApiError::Timeout {
            message: "Request timeout".to_string(),
            user_message: TIMEOUT_USER_MESSAGE.to_string(),
        },
        FailureSignal::Transport(detail) => ApiError::Network {
            message: format!("Network error: {detail}"),
            user_message: NETWORK_USER_MESSAGE.to_string(),
        },
        FailureSignal::Status { status, .. } if status >= 500 => ApiError::Server {
            message: format!("Server error: {status}"),
            user_message: SERVER_USER_MESSAGE.to_string(),
        },
        FailureSignal::Status { status: 404, url } => ApiError::Validation {
            message: format!("Not found: {url}"),
            user_message: NOT_FOUND_USER_MESSAGE.to_string(),
        },
        FailureSignal::Status { status, .. } => ApiError::Server {
            message: format!("HTTP error: {status}"),
            user_message: REQUEST_FAILED_USER_MESSAGE.to_string(),
        },
        FailureSignal::Classified(err) => err,
        FailureSignal::Other(detail) => ApiError::Unknown {
            message: detail,
            user_message: UNKNOWN_USER_MESSAGE.to_string(),
        },
    }
}

/// Errors returned by operations that propagate failures to the caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request failed and was classified.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The service refused the request and explained why in the body.
    #[error("request rejected ({status}): {}", detail.message)]
    Rejected {
        status: u16,
        detail: ApiErrorResponse,
    },

    /// The caller passed a value the service would never accept.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The client configuration is unusable (e.g. a malformed base URL).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ServiceError {
    /// The failure kind, when the error came from a classified request.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ServiceError::Api(err) => Some(err.kind()),
            _ => None,
        }
    }

    /// Text suitable for display to the user, whatever the error source.
    pub fn user_message(&self) -> &str {
        match self {
            ServiceError::Api(err) => err.user_message(),
            ServiceError::Rejected { detail, .. } => &detail.message,
            ServiceError::InvalidInput(message) | ServiceError::InvalidConfig(message) => message,
        }
    }
}
