//! Flat reachability observations.

use serde::{Deserialize, Serialize};

use super::band::TimeBand;

/// WGS84 coordinate as reported by the routing service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// One direct-reachability observation: a station seen on a line from an
/// origin within a band.
///
/// Rows are never mutated after normalization. The same station can appear
/// in many rows (different bands, or different lines within one band).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRow {
    /// Origin display name.
    pub target: String,
    /// Origin node id.
    pub target_node: String,
    pub time_range: TimeBand,
    /// `time_range` as its `"<lower>-<higher>"` label.
    pub time_band: String,
    pub line: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_color: Option<String>,
    pub station_id: String,
    pub station_name: String,
    pub time_minutes: u32,
    pub transit_count: u32,
    /// Raw address text, empty when the service had none.
    pub rough_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_ward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coord: Option<Coord>,
}
