//! sockslens core: the request-timing instrumentation facade for the proxy.
//!
//! This crate owns the fixed set of metric instruments (request counters,
//! duration summaries, latency histograms) and the fire-and-forget recording
//! operations the proxy core calls around each connection. It carries no
//! transport or runtime dependencies so it can be embedded wherever the
//! proxy handles requests.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are denied under clippy here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `SocksLensError`/`Result` so the proxy
//! process does not crash on a bad metrics setup.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod instrument;
pub mod label;
pub mod metrics;

/// Shared result type.
pub use error::{Result, SocksLensError};
pub use label::LabelMode;
pub use metrics::{MetricsConfig, ProxyMetrics};
