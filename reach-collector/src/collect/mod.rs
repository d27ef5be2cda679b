//! Collection of flat reachability rows.
//!
//! The driver walks the configured origin × band matrix one request at a
//! time, and the normalizer turns each response into direct-reachability
//! rows.

mod driver;
mod normalize;

pub use driver::{CollectError, DEFAULT_PACING, Matrix, RangeMatrixDriver, ReachableSource};
pub use normalize::normalize;
