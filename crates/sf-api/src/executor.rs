// executor.rs - Deadline-bounded request execution.
//
// RequestExecutor performs one HTTP exchange (send + full body read) and
// turns every way it can fail into a classified ApiError. A bounded exchange
// races against a timer; when the timer wins the exchange future is dropped,
// which aborts the in-flight connection. The timer is owned by the call and
// is dropped on every exit path.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{classify, ApiError, FailureSignal};

/// How long a single exchange may take.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Deadline {
    /// The executor's configured default.
    #[default]
    Default,
    /// An explicit limit for this call.
    After(Duration),
    /// No limit: wait for the transport to finish or fail.
    Unbounded,
}

/// A fully read response, whatever its status.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub url: Url,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON. A body that does not match `T` is an Unknown failure.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            classify(FailureSignal::Other(format!(
                "invalid response body from {}: {e}",
                self.url
            )))
        })
    }

    /// Keep the response if its status is 2xx, otherwise classify the status.
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            return Ok(self);
        }
        let err = classify(FailureSignal::Status {
            status: self.status.as_u16(),
            url: self.url.to_string(),
        });
        warn!(
            kind = %err.kind(),
            status = self.status.as_u16(),
            url = %self.url,
            "request returned error status"
        );
        Err(err)
    }
}

/// Sends requests with a deadline and uniform failure classification.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    http: reqwest::Client,
    default_timeout: Duration,
}

impl RequestExecutor {
    pub fn new(http: reqwest::Client, default_timeout: Duration) -> Self {
        Self {
            http,
            default_timeout,
        }
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Start building a request on the executor's HTTP client.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Perform the exchange and require a 2xx status.
    pub async fn execute(
        &self,
        request: RequestBuilder,
        deadline: Deadline,
    ) -> Result<RawResponse, ApiError> {
        self.send(request, deadline).await?.error_for_status()
    }

    /// Perform the exchange; any status is returned as-is.
    ///
    /// Fails only when the deadline elapses, the transport fails, or the
    /// request cannot be built.
    pub async fn send(
        &self,
        request: RequestBuilder,
        deadline: Deadline,
    ) -> Result<RawResponse, ApiError> {
        let request = request
            .build()
            .map_err(|e| self.fail(None, FailureSignal::from_reqwest(&e)))?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, ?deadline, "sending request");

        let exchange = async {
            let response = self.http.execute(request).await?;
            let status = response.status();
            let url = response.url().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(RawResponse {
                status,
                url,
                body: body.to_vec(),
            })
        };

        let outcome = match self.limit(deadline) {
            Some(limit) => match tokio::time::timeout(limit, exchange).await {
                Ok(outcome) => outcome,
                Err(_) => return Err(self.fail(Some(&url), FailureSignal::Aborted)),
            },
            None => exchange.await,
        };

        outcome.map_err(|e| self.fail(Some(&url), FailureSignal::from_reqwest(&e)))
    }

    fn limit(&self, deadline: Deadline) -> Option<Duration> {
        match deadline {
            Deadline::Default => Some(self.default_timeout),
            Deadline::After(limit) => Some(limit),
            Deadline::Unbounded => None,
        }
    }

    fn fail(&self, url: Option<&Url>, signal: FailureSignal) -> ApiError {
        let err = classify(signal);
        match url {
            Some(url) => warn!(kind = %err.kind(), %url, error = %err.message(), "request failed"),
            None => warn!(kind = %err.kind(), error = %err.message(), "request failed"),
        }
        err
    }
}
