//! Domain types for reachability collection.
//!
//! Origins and time bands describe the query matrix; flat rows are the
//! observations the normalizer produces from routing-service responses.

mod address;
mod band;
mod origin;
mod row;

pub use address::{ParsedAddress, parse_address};
pub use band::{InvalidTimeBand, TimeBand, label as band_label};
pub use origin::Origin;
pub use row::{Coord, FlatRow};
