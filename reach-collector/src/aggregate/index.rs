//! Origin → band → stations reverse index.

use serde::Serialize;

use crate::domain::{Origin, TimeBand};

use super::ordered::{InsertionMap, InsertionSet};

/// Stations ever observed within each band for one origin.
///
/// This is an observation ledger: a station stays listed under every band it
/// was seen in, even after its best `ReachableInfo` moved to another band.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetIndexEntry {
    pub target: String,
    pub target_node: String,
    pub time_bands: InsertionMap<TimeBand, InsertionSet<String>>,
}

impl TargetIndexEntry {
    /// Entry for `origin` with an empty list for each band, in band order.
    pub fn seeded(origin: &Origin, bands: &[TimeBand]) -> Self {
        let mut time_bands = InsertionMap::new();
        for &band in bands {
            time_bands.get_or_insert_with(band, InsertionSet::new);
        }
        Self {
            target: origin.name.clone(),
            target_node: origin.node.clone(),
            time_bands,
        }
    }

    /// Record that `station_id` was seen within `band`.
    pub fn record(&mut self, band: TimeBand, station_id: &str) {
        let stations = self.time_bands.get_or_insert_with(band, InsertionSet::new);
        if !stations.contains(station_id) {
            stations.insert(station_id.to_string());
        }
    }

    /// Stations listed under `band`.
    pub fn stations_in(&self, band: TimeBand) -> &[String] {
        self.time_bands
            .get(&band)
            .map(InsertionSet::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(s: &str) -> TimeBand {
        s.parse().unwrap()
    }

    #[test]
    fn seeded_entry_lists_every_band_in_order() {
        let origin = Origin::new("茅場町", "00001303");
        let bands = [band("20-30"), band("100-110"), band("0-10")];
        let entry = TargetIndexEntry::seeded(&origin, &bands);

        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"target":"茅場町","targetNode":"00001303","timeBands":{"20-30":[],"100-110":[],"0-10":[]}}"#
        );
    }

    #[test]
    fn record_dedups_and_keeps_first_seen_order() {
        let origin = Origin::new("o", "n");
        let mut entry = TargetIndexEntry::seeded(&origin, &[band("0-10")]);

        entry.record(band("0-10"), "B");
        entry.record(band("0-10"), "A");
        entry.record(band("0-10"), "B");
        entry.record(band("40-50"), "C");

        assert_eq!(entry.stations_in(band("0-10")), ["B", "A"]);
        assert_eq!(entry.stations_in(band("40-50")), ["C"]);
        assert!(entry.stations_in(band("10-20")).is_empty());
    }
}
