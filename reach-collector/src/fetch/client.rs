//! Resilient JSON-over-HTTP fetcher.
//!
//! Knows nothing about routing or stations: give it a URL, get back a
//! deserialized body or the last error after retries ran out.

use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::de::DeserializeOwned;

use super::error::FetchError;
use super::policy::RetryPolicy;
use super::retry::{Sleeper, TokioSleeper, retry_with_backoff};

/// How much of an unparseable body to keep in the error.
const BODY_SNIPPET_CHARS: usize = 500;

/// HTTP GET with per-attempt timeout, retries and exponential backoff.
///
/// Each attempt runs under its own `tokio::time::timeout`. When the timeout
/// fires the request future is dropped, which aborts the in-flight request
/// and releases its connection before the next attempt starts.
#[derive(Debug, Clone)]
pub struct ResilientFetcher<S = TokioSleeper> {
    http: reqwest::Client,
    policy: RetryPolicy,
    sleeper: S,
}

impl ResilientFetcher {
    /// Create a fetcher sleeping on the tokio timer.
    pub fn new(policy: RetryPolicy) -> Result<Self, FetchError> {
        Self::with_sleeper(policy, TokioSleeper)
    }
}

impl<S: Sleeper> ResilientFetcher<S> {
    /// Create a fetcher that waits out backoff delays through `sleeper`.
    pub fn with_sleeper(policy: RetryPolicy, sleeper: S) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            policy,
            sleeper,
        })
    }

    /// The policy used when a request doesn't bring its own.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GET `url` and parse the body as JSON using the default policy.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        self.get_json_with(url, &self.policy).await
    }

    /// GET `url` and parse the body as JSON using `policy` for this request.
    pub async fn get_json_with<T: DeserializeOwned>(
        &self,
        url: &Url,
        policy: &RetryPolicy,
    ) -> Result<T, FetchError> {
        retry_with_backoff(policy, &self.sleeper, |_| async move {
            match tokio::time::timeout(policy.timeout, self.attempt::<T>(url)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(policy.timeout)),
            }
        })
        .await
    }

    async fn attempt<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FetchError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
        })
    }
}
