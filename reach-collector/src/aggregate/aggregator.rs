//! Row stream → station index fold.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::config::RunConfig;
use crate::domain::FlatRow;

use super::index::TargetIndexEntry;
use super::ordered::InsertionMap;
use super::station::StationRecord;

/// The aggregated snapshot written once per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredOutput {
    #[serde(serialize_with = "iso_millis")]
    pub generated_at: DateTime<Utc>,
    pub source: RunConfig,
    pub stations_by_id: BTreeMap<String, StationRecord>,
    pub targets_index: InsertionMap<String, TargetIndexEntry>,
}

fn iso_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Incremental station index builder.
///
/// Rows can be fed one at a time; [`aggregate`] is the whole-slice fold.
#[derive(Debug, Clone)]
pub struct StationAggregator {
    stations: BTreeMap<String, StationRecord>,
    targets: InsertionMap<String, TargetIndexEntry>,
}

impl StationAggregator {
    /// Start an index with an empty band ledger for every configured origin.
    pub fn new(run: &RunConfig) -> Self {
        let mut targets = InsertionMap::new();
        for origin in &run.targets {
            targets.get_or_insert_with(origin.node.clone(), || {
                TargetIndexEntry::seeded(origin, &run.ranges)
            });
        }

        Self {
            stations: BTreeMap::new(),
            targets,
        }
    }

    /// Merge one row.
    pub fn ingest(&mut self, row: &FlatRow) {
        self.stations
            .entry(row.station_id.clone())
            .or_insert_with(|| StationRecord::new(row))
            .absorb(row);

        self.targets
            .get_or_insert_with(row.target_node.clone(), || TargetIndexEntry {
                target: row.target.clone(),
                target_node: row.target_node.clone(),
                time_bands: InsertionMap::new(),
            })
            .record(row.time_range, &row.station_id);
    }

    /// Stations merged so far.
    pub fn stations(&self) -> &BTreeMap<String, StationRecord> {
        &self.stations
    }

    /// Reverse index built so far.
    pub fn targets(&self) -> &InsertionMap<String, TargetIndexEntry> {
        &self.targets
    }

    /// Close the index into the persisted snapshot.
    pub fn finish(self, source: RunConfig, generated_at: DateTime<Utc>) -> StructuredOutput {
        StructuredOutput {
            generated_at,
            source,
            stations_by_id: self.stations,
            targets_index: self.targets,
        }
    }
}

/// Fold `rows`, in order, into the station index.
pub fn aggregate(rows: &[FlatRow], run: &RunConfig, generated_at: DateTime<Utc>) -> StructuredOutput {
    let aggregator = rows
        .iter()
        .fold(StationAggregator::new(run), |mut acc, row| {
            acc.ingest(row);
            acc
        });

    debug!(
        rows = rows.len(),
        stations = aggregator.stations().len(),
        "aggregated rows"
    );

    aggregator.finish(run.clone(), generated_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coord, Origin, TimeBand};
    use crate::navitime::SearchParams;

    fn band(s: &str) -> TimeBand {
        s.parse().unwrap()
    }

    fn run() -> RunConfig {
        RunConfig {
            params: SearchParams::default(),
            targets: vec![Origin::new("Target One", "TARGET1"), Origin::new("Target Two", "TARGET2")],
            ranges: vec![band("0-10"), band("10-20"), band("20-30")],
        }
    }

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-05T09:30:00.250Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn row(origin: &str, band_label: &str, line: &str, station: &str, minutes: u32) -> FlatRow {
        FlatRow {
            target: format!("name of {origin}"),
            target_node: origin.to_string(),
            time_range: band(band_label),
            time_band: band_label.to_string(),
            line: line.to_string(),
            line_id: Some(format!("id-{line}")),
            line_color: Some(format!("color-{line}")),
            station_id: station.to_string(),
            station_name: format!("Station {station}"),
            time_minutes: minutes,
            transit_count: 0,
            rough_address: String::new(),
            pref: None,
            city_ward: None,
            coord: None,
        }
    }

    #[test]
    fn same_minutes_in_later_band_keeps_earlier_band() {
        let rows = vec![
            row("TARGET1", "0-10", "L1", "S", 8),
            row("TARGET1", "10-20", "L2", "S", 8),
        ];

        let out = aggregate(&rows, &run(), at());
        let station = &out.stations_by_id["S"];
        let best = station.reachable.get("TARGET1").unwrap();

        assert_eq!(best.time_minutes, 8);
        assert_eq!(best.time_band, band("0-10"));
        assert_eq!(best.line, "L1");
        assert_eq!(station.lines.as_slice(), ["L1", "L2"]);
    }

    #[test]
    fn faster_observation_in_later_band_wins() {
        let rows = vec![
            row("TARGET1", "0-10", "L1", "S", 9),
            row("TARGET1", "10-20", "L2", "S", 7),
        ];

        let out = aggregate(&rows, &run(), at());
        let best = out.stations_by_id["S"].reachable.get("TARGET1").unwrap();

        assert_eq!(best.time_minutes, 7);
        assert_eq!(best.time_band, band("10-20"));
        assert_eq!(best.line, "L2");
    }

    #[test]
    fn no_rows_leave_seeded_index_only() {
        let out = aggregate(&[], &run(), at());

        assert!(out.stations_by_id.is_empty());
        assert_eq!(out.targets_index.len(), 2);
        for entry in out.targets_index.values() {
            assert_eq!(entry.time_bands.len(), 3);
            assert!(entry.time_bands.values().all(|s| s.is_empty()));
        }
    }

    #[test]
    fn repeated_row_changes_nothing() {
        let r = row("TARGET1", "0-10", "L1", "S", 4);
        let mut aggregator = StationAggregator::new(&run());
        aggregator.ingest(&r);
        let stations = aggregator.stations().clone();
        let targets = aggregator.targets().clone();

        aggregator.ingest(&r);

        assert_eq!(aggregator.stations(), &stations);
        assert_eq!(aggregator.targets(), &targets);
    }

    #[test]
    fn one_entry_per_origin() {
        let rows = vec![
            row("TARGET1", "0-10", "L1", "S", 9),
            row("TARGET2", "10-20", "L1", "S", 14),
            row("TARGET1", "20-30", "L1", "S", 25),
            row("TARGET2", "0-10", "L3", "S", 6),
        ];

        let out = aggregate(&rows, &run(), at());
        let reachable = &out.stations_by_id["S"].reachable;

        assert_eq!(reachable.len(), 2);
        assert_eq!(reachable.get("TARGET1").unwrap().time_minutes, 9);
        assert_eq!(reachable.get("TARGET2").unwrap().time_minutes, 6);
        assert_eq!(reachable.get("TARGET2").unwrap().line, "L3");
    }

    #[test]
    fn band_ledger_keeps_every_observed_band() {
        let rows = vec![
            row("TARGET1", "10-20", "L1", "S", 12),
            row("TARGET1", "10-20", "L2", "S", 12),
            row("TARGET1", "0-10", "L1", "S", 8),
        ];

        let out = aggregate(&rows, &run(), at());
        let entry = out.targets_index.get("TARGET1").unwrap();

        assert_eq!(entry.stations_in(band("10-20")), ["S"]);
        assert_eq!(entry.stations_in(band("0-10")), ["S"]);
        assert_eq!(
            out.stations_by_id["S"].reachable.get("TARGET1").unwrap().time_band,
            band("0-10")
        );
    }

    #[test]
    fn unconfigured_origin_gets_index_entry_on_demand() {
        let out = aggregate(&[row("OTHER", "40-50", "L1", "S", 41)], &run(), at());

        let entry = out.targets_index.get("OTHER").unwrap();
        assert_eq!(entry.target, "name of OTHER");
        assert_eq!(entry.stations_in(band("40-50")), ["S"]);
        assert_eq!(out.targets_index.keys().last().unwrap(), "OTHER");
    }

    #[test]
    fn first_non_empty_location_wins() {
        let mut first = row("TARGET1", "0-10", "L1", "S", 5);
        first.rough_address = String::new();
        first.coord = None;

        let mut second = row("TARGET1", "10-20", "L1", "S", 12);
        second.rough_address = "東京都中央区築地".into();
        second.pref = Some("東京都".into());
        second.city_ward = Some("中央区".into());
        second.coord = Some(Coord { lat: 1.0, lon: 2.0 });

        let mut third = row("TARGET2", "0-10", "L1", "S", 3);
        third.rough_address = "東京都江東区豊洲".into();
        third.pref = Some("東京都".into());
        third.city_ward = Some("江東区".into());
        third.coord = Some(Coord { lat: 9.0, lon: 9.0 });

        let out = aggregate(&[first, second, third], &run(), at());
        let station = &out.stations_by_id["S"];

        assert_eq!(station.rough_address, "東京都中央区築地");
        assert_eq!(station.city_ward.as_deref(), Some("中央区"));
        assert_eq!(station.coord, Some(Coord { lat: 1.0, lon: 2.0 }));
    }

    #[test]
    fn conflicting_locations_depend_on_row_order() {
        let mut a = row("TARGET1", "0-10", "L1", "S", 5);
        a.rough_address = "東京都中央区".into();
        let mut b = row("TARGET1", "10-20", "L2", "S", 15);
        b.rough_address = "東京都港区".into();

        let forward = aggregate(&[a.clone(), b.clone()], &run(), at());
        let backward = aggregate(&[b, a], &run(), at());

        assert_eq!(forward.stations_by_id["S"].rough_address, "東京都中央区");
        assert_eq!(backward.stations_by_id["S"].rough_address, "東京都港区");
        // The merge itself still agrees
        assert_eq!(
            forward.stations_by_id["S"].reachable,
            backward.stations_by_id["S"].reachable
        );
    }

    #[test]
    fn line_meta_last_write_wins() {
        let mut a = row("TARGET1", "0-10", "L1", "S", 5);
        a.line_color = Some("#111111".into());
        let mut b = row("TARGET1", "10-20", "L1", "S", 15);
        b.line_color = None;

        let out = aggregate(&[a, b], &run(), at());
        let meta = &out.stations_by_id["S"].line_meta["L1"];

        assert_eq!(meta.id.as_deref(), Some("id-L1"));
        assert_eq!(meta.color, None);
    }

    #[test]
    fn structured_output_shape() {
        let mut r = row("TARGET1", "0-10", "L1", "S", 5);
        r.coord = Some(Coord { lat: 35.5, lon: 139.5 });

        let out = aggregate(&[r], &run(), at());
        let json = serde_json::to_value(&out).unwrap();

        assert_eq!(json["generatedAt"], "2026-01-05T09:30:00.250Z");
        assert_eq!(json["source"]["transitLimit"], 0);
        assert_eq!(json["source"]["firstTrain"], true);
        assert_eq!(json["source"]["expressTrain"], false);
        assert_eq!(json["source"]["targets"][0]["node"], "TARGET1");
        assert_eq!(json["source"]["ranges"][1]["lower"], 10);
        assert_eq!(json["stationsById"]["S"]["coord"]["lat"], 35.5);
        assert_eq!(json["stationsById"]["S"]["lines"], serde_json::json!(["L1"]));
        assert_eq!(json["stationsById"]["S"]["lineMeta"]["L1"]["color"], "color-L1");
        assert_eq!(json["stationsById"]["S"]["reachable"][0]["timeBand"], "0-10");
        assert_eq!(
            json["targetsIndex"]["TARGET1"]["timeBands"]["0-10"],
            serde_json::json!(["S"])
        );
        assert_eq!(
            json["targetsIndex"]["TARGET2"]["timeBands"]["20-30"],
            serde_json::json!([])
        );
    }
}
