//! Station index built from flat rows.
//!
//! Rows for the same station are merged into one [`StationRecord`] keeping
//! the best observation per origin, and every origin gets a band → stations
//! ledger in [`TargetIndexEntry`].

mod aggregator;
mod index;
mod ordered;
mod station;

pub use aggregator::{StationAggregator, StructuredOutput, aggregate};
pub use index::TargetIndexEntry;
pub use ordered::{InsertionMap, InsertionSet};
pub use station::{LineMeta, ReachableByOrigin, ReachableInfo, StationRecord, pick_better_reachable};
