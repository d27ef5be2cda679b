//! Replay source serving recorded responses from disk.
//!
//! Lets a full run execute offline, e.g. to rebuild the aggregated output
//! after changing merge rules without hitting the routing service again.

use std::collections::HashMap;
use std::path::Path;

use crate::collect::ReachableSource;
use crate::domain::TimeBand;
use crate::fetch::FetchError;

use super::request::ReachableRequest;
use super::types::ReachableResponse;

/// Source answering from `<node>_<lower>-<higher>.json` recordings.
#[derive(Debug, Clone)]
pub struct MockReachableSource {
    responses: HashMap<(String, TimeBand), ReachableResponse>,
}

impl MockReachableSource {
    /// Load every recording in `data_dir`.
    ///
    /// Files whose names don't follow `<node>_<lower>-<higher>.json` are
    /// skipped. A recording that fails to parse, or a directory without any
    /// recording, is an error.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let data_dir = data_dir.as_ref();
        let mut responses = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            FetchError::Replay(format!("failed to read {}: {e}", data_dir.display()))
        })?;

        for entry in entries {
            let entry = entry
                .map_err(|e| FetchError::Replay(format!("failed to read directory entry: {e}")))?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            // "00001303_10-20.json" -> ("00001303", 10-20)
            let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(parse_recording_name)
            else {
                continue;
            };

            let json = std::fs::read_to_string(&path)
                .map_err(|e| FetchError::Replay(format!("failed to read {}: {e}", path.display())))?;

            let response: ReachableResponse = serde_json::from_str(&json).map_err(|e| {
                FetchError::Replay(format!("failed to parse {}: {e}", path.display()))
            })?;

            responses.insert(key, response);
        }

        if responses.is_empty() {
            return Err(FetchError::Replay(format!(
                "no recordings found in {}",
                data_dir.display()
            )));
        }

        Ok(Self { responses })
    }

    /// Create a source from in-memory responses.
    pub fn from_responses(
        responses: impl IntoIterator<Item = ((String, TimeBand), ReachableResponse)>,
    ) -> Self {
        Self {
            responses: responses.into_iter().collect(),
        }
    }

    /// Number of recorded cells.
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Check if there are no recordings.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

fn parse_recording_name(stem: &str) -> Option<(String, TimeBand)> {
    let (node, band) = stem.rsplit_once('_')?;
    if node.is_empty() {
        return None;
    }
    Some((node.to_string(), band.parse().ok()?))
}

impl ReachableSource for MockReachableSource {
    async fn fetch_reachable(
        &self,
        request: &ReachableRequest<'_>,
    ) -> Result<ReachableResponse, FetchError> {
        let key = (request.origin.node.clone(), request.band);
        self.responses.get(&key).cloned().ok_or_else(|| {
            FetchError::NotFound(format!("{}_{}", request.origin.node, request.band))
        })
    }
}
