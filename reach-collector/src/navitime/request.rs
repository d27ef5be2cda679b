//! Reachable-route request construction.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::domain::{Origin, TimeBand};

/// Query flags fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Maximum number of transfers the service should consider.
    pub transit_limit: u32,
    /// Assume the first train of the day.
    pub first_train: bool,
    /// Allow express trains.
    pub express_train: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            transit_limit: 0,
            first_train: true,
            express_train: false,
        }
    }
}

/// One cell of the origin × band matrix.
#[derive(Debug, Clone, Copy)]
pub struct ReachableRequest<'a> {
    pub origin: &'a Origin,
    pub band: TimeBand,
    pub params: &'a SearchParams,
}

impl ReachableRequest<'_> {
    /// Build the endpoint URL for this request on top of `base`.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair("start", &self.origin.node)
            .append_pair("lower_term", &self.band.lower.to_string())
            .append_pair("higher_term", &self.band.higher.to_string())
            .append_pair("transit_limit", &self.params.transit_limit.to_string())
            .append_pair("first_train", flag(self.params.first_train))
            .append_pair("express_train", flag(self.params.express_train));
        url
    }
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}
