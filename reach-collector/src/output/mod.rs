//! Persisted run artifacts.
//!
//! Two JSON files per run: the flat row list and the aggregated station
//! index. Each is replaced atomically.

mod error;
mod writer;

pub use error::OutputError;
pub use writer::{FLAT_FILE, OutputWriter, STRUCTURED_FILE, WriteReport};
