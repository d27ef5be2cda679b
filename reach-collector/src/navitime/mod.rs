//! Client for the reachable-route API.
//!
//! The endpoint answers "which stations can be reached from this start node
//! within `lower_term..higher_term` minutes", grouped by line. Each
//! response covers one origin and one time band.

mod client;
mod mock;
mod request;
mod types;

pub use client::{DEFAULT_BASE_URL, NavitimeClient, NavitimeConfig};
pub use mock::MockReachableSource;
pub use request::{ReachableRequest, SearchParams};
pub use types::{ApiCoord, ApiCount, ApiLink, ApiNodeDetail, ApiStation, ReachableResponse};
