//! Reachable-route HTTP client.
//!
//! Builds the endpoint URL for each matrix cell and fetches it through a
//! [`ResilientFetcher`] with the run's retry policy.

use reqwest::Url;
use tracing::debug;

use crate::collect::ReachableSource;
use crate::fetch::{FetchError, ResilientFetcher, RetryPolicy, Sleeper, TokioSleeper};

use super::request::ReachableRequest;
use super::types::ReachableResponse;

/// Default reachable-route endpoint.
pub const DEFAULT_BASE_URL: &str = "https://realestate.navitime.co.jp/api/route/reachable";

/// Configuration for the reachable-route client.
#[derive(Debug, Clone)]
pub struct NavitimeConfig {
    /// Endpoint URL, without query string
    pub base_url: String,
    /// Retry policy applied to every request
    pub policy: RetryPolicy,
}

impl NavitimeConfig {
    /// Create a config for the production endpoint.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            policy,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for NavitimeConfig {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

/// Live client for the reachable-route endpoint.
#[derive(Debug, Clone)]
pub struct NavitimeClient<S = TokioSleeper> {
    fetcher: ResilientFetcher<S>,
    base_url: Url,
}

impl NavitimeClient {
    /// Create a client backing off on the tokio timer.
    pub fn new(config: NavitimeConfig) -> Result<Self, FetchError> {
        Self::with_sleeper(config, TokioSleeper)
    }
}

impl<S: Sleeper> NavitimeClient<S> {
    /// Create a client backing off through `sleeper`.
    pub fn with_sleeper(config: NavitimeConfig, sleeper: S) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| FetchError::InvalidUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;
        let fetcher = ResilientFetcher::with_sleeper(config.policy, sleeper)?;

        Ok(Self { fetcher, base_url })
    }

    /// Endpoint URL requests are built on.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl<S: Sleeper> ReachableSource for NavitimeClient<S> {
    async fn fetch_reachable(
        &self,
        request: &ReachableRequest<'_>,
    ) -> Result<ReachableResponse, FetchError> {
        let url = request.to_url(&self.base_url);
        debug!(%url, "GET reachable");
        self.fetcher.get_json(&url).await
    }
}
