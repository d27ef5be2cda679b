//! Collector of stations reachable without a transfer.
//!
//! Queries a reachable-route service for a fixed set of origins across
//! consecutive minute bands, keeps only direct-ride stations, and writes a
//! flat row dump plus a per-station index keyed by station id.

pub mod aggregate;
pub mod collect;
pub mod config;
pub mod domain;
pub mod fetch;
pub mod navitime;
pub mod output;
pub mod pipeline;
