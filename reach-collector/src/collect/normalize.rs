//! Response → flat row normalization.

use tracing::debug;

use crate::domain::{Coord, FlatRow, Origin, TimeBand, parse_address};
use crate::navitime::ReachableResponse;

/// Flatten one response into direct-reachability rows.
///
/// Only stations with `transit_count == 0` become rows. Stations without a
/// coordinate are kept with `coord: None`. Rows come out in response order:
/// links first, then stations within each link.
pub fn normalize(response: &ReachableResponse, origin: &Origin, band: TimeBand) -> Vec<FlatRow> {
    let label = band.label();
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for link in &response.links {
        for station in &link.stations {
            if station.transit_count != 0 {
                skipped += 1;
                continue;
            }

            let address = station
                .node_detail
                .as_ref()
                .and_then(|d| d.address_name.clone())
                .unwrap_or_default();
            let parsed = parse_address(&address);

            rows.push(FlatRow {
                target: origin.name.clone(),
                target_node: origin.node.clone(),
                time_range: band,
                time_band: label.clone(),
                line: link.link_name.clone(),
                line_id: Some(link.link_id.clone()),
                line_color: link.link_color.clone(),
                station_id: station.node_id.clone(),
                station_name: station.name.clone(),
                time_minutes: station.time,
                transit_count: station.transit_count,
                rough_address: address,
                pref: parsed.pref,
                city_ward: parsed.city_ward,
                coord: station.coord.map(|c| Coord {
                    lat: c.lat,
                    lon: c.lon,
                }),
            });
        }
    }

    debug!(
        origin = %origin.name,
        band = %label,
        kept = rows.len(),
        skipped,
        "normalized response"
    );

    rows
}
