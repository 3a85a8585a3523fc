//! Shared application state for the sockslens exporter.
//!
//! Holds the configuration and the single `ProxyMetrics` facade. State is
//! built once at startup; a duplicate metric registration surfaces here as
//! an error instead of a panic so `main` can refuse to come up.

use std::sync::Arc;

use sockslens_core::error::Result;
use sockslens_core::ProxyMetrics;

use crate::config::ExporterConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ExporterConfig,
    metrics: ProxyMetrics,
}

impl AppState {
    /// Build application state, registering every metric instrument.
    /// Returns `Err` on duplicate or invalid registration (fatal at startup).
    pub fn new(cfg: ExporterConfig) -> Result<Self> {
        let metrics = ProxyMetrics::new(&cfg.metrics.to_metrics_config())?;
        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, metrics }),
        })
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &ProxyMetrics {
        &self.inner.metrics
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config;

    #[test]
    fn state_builds_and_renders() {
        let cfg = config::load_from_str("version: 1\n").unwrap();
        let state = AppState::new(cfg).unwrap();
        state.metrics().record_handled();
        let text = state.metrics().render().unwrap();
        assert!(text.contains("sockslens_requests_handled_total 1"));
    }
}
