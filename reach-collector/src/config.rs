//! Collector configuration.
//!
//! Loaded from YAML. Every field has a default, so an empty file (or no file
//! at all) describes the standard three-origin, four-band run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::collect::Matrix;
use crate::domain::{InvalidTimeBand, Origin, TimeBand};
use crate::fetch::RetryPolicy;
use crate::navitime::{DEFAULT_BASE_URL, NavitimeConfig, SearchParams};

/// Page linked from each default origin, with the node id appended.
const ORIGIN_PAGE_PREFIX: &str = "https://realestate.navitime.co.jp/chintai/reachable?node=";

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("no origins configured")]
    NoOrigins,

    #[error("no time bands configured")]
    NoBands,

    #[error(transparent)]
    InvalidBand(#[from] InvalidTimeBand),

    #[error("origin node {0} is configured twice")]
    DuplicateOrigin(String),

    #[error("time band {0} is configured twice")]
    DuplicateBand(TimeBand),

    #[error("fetch.timeout_ms must be greater than zero")]
    ZeroTimeout,
}

/// Fetch retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Retries after the first attempt
    pub retries: u32,
    /// Base backoff delay (ms), doubled per retry
    pub backoff_ms: u64,
    /// Per-attempt timeout (ms)
    pub timeout_ms: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            retries: 4,
            backoff_ms: 700,
            timeout_ms: 45_000,
        }
    }
}

/// Everything a run needs, as read from the config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Reachable-route endpoint
    pub base_url: String,
    /// Directory the artifacts are written to
    pub output_dir: PathBuf,
    /// Pause between consecutive requests (ms)
    pub pacing_ms: u64,
    pub fetch: FetchSettings,
    pub transit_limit: u32,
    pub first_train: bool,
    pub express_train: bool,
    pub origins: Vec<Origin>,
    pub bands: Vec<TimeBand>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        let params = SearchParams::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("output"),
            pacing_ms: 250,
            fetch: FetchSettings::default(),
            transit_limit: params.transit_limit,
            first_train: params.first_train,
            express_train: params.express_train,
            origins: default_origins(),
            bands: default_bands(),
        }
    }
}

fn default_origins() -> Vec<Origin> {
    [
        ("茅場町", "00001303"),
        ("八丁堀", "00007548"),
        ("水天宮前", "00004569"),
    ]
    .into_iter()
    .map(|(name, node)| Origin::new(name, node).with_base_url(format!("{ORIGIN_PAGE_PREFIX}{node}")))
    .collect()
}

fn default_bands() -> Vec<TimeBand> {
    (0..4)
        .map(|i| TimeBand {
            lower: i * 10,
            higher: i * 10 + 10,
        })
        .collect()
}

impl CollectorConfig {
    /// Read a YAML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&content)
    }

    /// Parse a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document parses as unit, not as an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check the matrix is non-empty and free of duplicates, and that
    /// requests get a usable timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.origins.is_empty() {
            return Err(ConfigError::NoOrigins);
        }
        if self.bands.is_empty() {
            return Err(ConfigError::NoBands);
        }

        for (i, origin) in self.origins.iter().enumerate() {
            if self.origins[..i].iter().any(|o| o.node == origin.node) {
                return Err(ConfigError::DuplicateOrigin(origin.node.clone()));
            }
        }

        for (i, band) in self.bands.iter().enumerate() {
            band.check()?;
            if self.bands[..i].contains(band) {
                return Err(ConfigError::DuplicateBand(*band));
            }
        }

        if self.fetch.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }

    /// Query flags shared by every request.
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            transit_limit: self.transit_limit,
            first_train: self.first_train,
            express_train: self.express_train,
        }
    }

    /// The run parameters echoed into the structured output.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            params: self.search_params(),
            targets: self.origins.clone(),
            ranges: self.bands.clone(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.fetch.retries,
            Duration::from_millis(self.fetch.backoff_ms),
            Duration::from_millis(self.fetch.timeout_ms),
        )
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// Client settings for the live endpoint.
    pub fn navitime_config(&self) -> NavitimeConfig {
        NavitimeConfig::new(self.retry_policy()).with_base_url(&self.base_url)
    }
}

/// Run parameters as persisted in the structured output's `source` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(flatten)]
    pub params: SearchParams,
    pub targets: Vec<Origin>,
    pub ranges: Vec<TimeBand>,
}

impl RunConfig {
    /// The origin × band matrix this run covers.
    pub fn matrix(&self) -> Matrix<'_> {
        Matrix {
            origins: &self.targets,
            bands: &self.ranges,
            params: &self.params,
        }
    }
}
