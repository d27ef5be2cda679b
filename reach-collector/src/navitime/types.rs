//! Reachable-route API response DTOs.
//!
//! These map directly to the routing service's JSON. Only the fields the
//! normalizer needs are declared; unknown fields are ignored. Arrays the
//! service sometimes leaves out default to empty.

use serde::{Deserialize, Serialize};

/// Response from the reachable-route endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReachableResponse {
    /// Lines reachable from the start node, each with its stations.
    #[serde(default)]
    pub links: Vec<ApiLink>,

    /// Summary counts, when the service sends them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<ApiCount>,
}

/// One transit line in the response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiLink {
    pub link_id: String,
    pub link_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_color: Option<String>,
    #[serde(default)]
    pub stations: Vec<ApiStation>,
}

/// A station reachable along a line.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiStation {
    /// Minutes from the start node.
    pub time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coord: Option<ApiCoord>,
    pub name: String,
    pub node_id: String,
    /// Number of transfers needed; only `0` is ingested.
    pub transit_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_detail: Option<ApiNodeDetail>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ApiCoord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiNodeDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiCount {
    pub station: Option<u32>,
    pub link: Option<u32>,
}
