//! Per-station aggregate records.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Coord, FlatRow, TimeBand, band_label};

use super::ordered::{InsertionMap, InsertionSet};

/// Best known direct reachability of a station from one origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachableInfo {
    pub target: String,
    pub target_node: String,
    #[serde(with = "band_label")]
    pub time_band: TimeBand,
    pub time_minutes: u32,
    pub transit_count: u32,
    pub line: String,
}

impl ReachableInfo {
    pub fn from_row(row: &FlatRow) -> Self {
        Self {
            target: row.target.clone(),
            target_node: row.target_node.clone(),
            time_band: row.time_range,
            time_minutes: row.time_minutes,
            transit_count: row.transit_count,
            line: row.line.clone(),
        }
    }

    /// Strictly better than `other`: fewer minutes, or equal minutes from a
    /// band with a lower starting bound.
    pub fn beats(&self, other: &ReachableInfo) -> bool {
        (self.time_minutes, self.time_band.lower) < (other.time_minutes, other.time_band.lower)
    }
}

/// Pick the better of two observations for the same station and origin.
///
/// Smaller `time_minutes` wins; equal minutes go to the band with the
/// smaller lower bound (`10-20` over `20-30`). On a full tie `a` is kept.
pub fn pick_better_reachable<'a>(a: &'a ReachableInfo, b: &'a ReachableInfo) -> &'a ReachableInfo {
    if b.beats(a) { b } else { a }
}

/// One `ReachableInfo` per origin node, in first-seen origin order.
///
/// Serializes as an array of entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReachableByOrigin(InsertionMap<String, ReachableInfo>);

impl ReachableByOrigin {
    pub fn get(&self, origin_node: &str) -> Option<&ReachableInfo> {
        self.0.get(origin_node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReachableInfo> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keep `candidate` if its origin has no entry yet or it beats the
    /// stored one. Returns whether the stored entry changed.
    pub fn offer(&mut self, candidate: ReachableInfo) -> bool {
        match self.0.get_mut(candidate.target_node.as_str()) {
            Some(existing) if candidate.beats(existing) => {
                *existing = candidate;
                true
            }
            Some(_) => false,
            None => {
                self.0.insert(candidate.target_node.clone(), candidate);
                true
            }
        }
    }
}

impl Serialize for ReachableByOrigin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.values())
    }
}

/// Id and color of a line, as last reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Everything known about one station across all rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    pub station_id: String,
    pub station_name: String,
    pub rough_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_ward: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coord: Option<Coord>,
    pub lines: InsertionSet<String>,
    pub line_meta: BTreeMap<String, LineMeta>,
    pub reachable: ReachableByOrigin,
}

impl StationRecord {
    /// Seed a record from the first row seen for its station.
    pub fn new(row: &FlatRow) -> Self {
        Self {
            station_id: row.station_id.clone(),
            station_name: row.station_name.clone(),
            rough_address: row.rough_address.clone(),
            pref: row.pref.clone(),
            city_ward: row.city_ward.clone(),
            coord: row.coord,
            lines: InsertionSet::new(),
            line_meta: BTreeMap::new(),
            reachable: ReachableByOrigin::default(),
        }
    }

    /// Merge one row for this station into the record.
    pub fn absorb(&mut self, row: &FlatRow) {
        // First non-empty value wins for location fields
        if self.coord.is_none() {
            self.coord = row.coord;
        }
        if self.rough_address.is_empty() && !row.rough_address.is_empty() {
            self.rough_address = row.rough_address.clone();
            self.pref = row.pref.clone();
            self.city_ward = row.city_ward.clone();
        }

        self.lines.insert(row.line.clone());
        self.line_meta.insert(
            row.line.clone(),
            LineMeta {
                id: row.line_id.clone(),
                color: row.line_color.clone(),
            },
        );

        self.reachable.offer(ReachableInfo::from_row(row));
    }
}
