//! Rate-limit-friendly HTTP fetch layer.
//!
//! A [`ResilientFetcher`] performs a single GET with a per-attempt timeout,
//! retrying failed attempts (non-2xx, transport errors, timeouts, bad JSON)
//! with exponential backoff as described by a [`RetryPolicy`].

mod client;
mod error;
mod policy;
mod retry;

pub use client::ResilientFetcher;
pub use error::FetchError;
pub use policy::RetryPolicy;
pub use retry::{Sleeper, TokioSleeper, retry_with_backoff};

#[cfg(test)]
pub(crate) use retry::RecordingSleeper;
