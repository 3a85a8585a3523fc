//! Instruments the `prometheus` crate does not provide.
//!
//! Counters and histograms come straight from `prometheus`; the summary
//! (rolling-window quantiles) has no counterpart there, so it is implemented
//! here with `DashMap`-sharded per-label state and rendered directly in the
//! text exposition format.

pub mod summary;

pub use summary::RollingSummary;

/// Helper to escape label values.
pub(crate) fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}
