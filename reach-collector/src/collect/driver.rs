//! Origin × band collection loop.
//!
//! Requests run strictly one after another with a pause between them.
//! The routing service blocks bursts of requests.

use std::time::Duration;

use tracing::{error, info};

use crate::domain::{FlatRow, Origin, TimeBand};
use crate::fetch::{FetchError, Sleeper};
use crate::navitime::{ReachableRequest, ReachableResponse, SearchParams};

use super::normalize::normalize;

/// Default pause between consecutive requests.
pub const DEFAULT_PACING: Duration = Duration::from_millis(250);

/// Error from a collection run.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// A matrix cell failed after all retries
    #[error("fetching {origin} ({node}) band {band} failed: {source}")]
    Fetch {
        origin: String,
        node: String,
        band: TimeBand,
        source: FetchError,
    },
}

/// Source of reachable-route responses.
///
/// This abstraction lets the driver run against the live service, recorded
/// responses, or test doubles.
pub trait ReachableSource {
    /// Fetch the response for one origin/band cell, retries included.
    fn fetch_reachable(
        &self,
        request: &ReachableRequest<'_>,
    ) -> impl Future<Output = Result<ReachableResponse, FetchError>>;
}

impl<T: ReachableSource> ReachableSource for &T {
    fn fetch_reachable(
        &self,
        request: &ReachableRequest<'_>,
    ) -> impl Future<Output = Result<ReachableResponse, FetchError>> {
        (**self).fetch_reachable(request)
    }
}

/// The query matrix for one run.
#[derive(Debug, Clone)]
pub struct Matrix<'a> {
    pub origins: &'a [Origin],
    pub bands: &'a [TimeBand],
    pub params: &'a SearchParams,
}

impl Matrix<'_> {
    /// Number of requests a full run makes.
    pub fn cells(&self) -> usize {
        self.origins.len() * self.bands.len()
    }
}

/// Drives the matrix through a source, pacing requests with a sleeper.
pub struct RangeMatrixDriver<P, S> {
    source: P,
    sleeper: S,
    pacing: Duration,
}

impl<P: ReachableSource, S: Sleeper> RangeMatrixDriver<P, S> {
    /// Create a driver with the default pacing.
    pub fn new(source: P, sleeper: S) -> Self {
        Self {
            source,
            sleeper,
            pacing: DEFAULT_PACING,
        }
    }

    /// Set the pause between consecutive requests.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Collect rows for every origin × band cell, in matrix order.
    ///
    /// The first cell that fails aborts the run; rows gathered before the
    /// failure are dropped with it.
    pub async fn run(&self, matrix: &Matrix<'_>) -> Result<Vec<FlatRow>, CollectError> {
        let mut rows = Vec::new();
        let mut first = true;

        for origin in matrix.origins {
            for &band in matrix.bands {
                if !first {
                    self.sleeper.sleep(self.pacing).await;
                }
                first = false;

                let request = ReachableRequest {
                    origin,
                    band,
                    params: matrix.params,
                };
                info!(origin = %origin.name, node = %origin.node, %band, "requesting reachable stations");

                let response = self.source.fetch_reachable(&request).await.map_err(|e| {
                    error!(origin = %origin.name, %band, error = %e, "giving up on matrix cell");
                    CollectError::Fetch {
                        origin: origin.name.clone(),
                        node: origin.node.clone(),
                        band,
                        source: e,
                    }
                })?;

                let cell = normalize(&response, origin, band);
                info!(origin = %origin.name, %band, rows = cell.len(), "collected");
                rows.extend(cell);
            }
        }

        info!(cells = matrix.cells(), rows = rows.len(), "collection finished");
        Ok(rows)
    }
}
