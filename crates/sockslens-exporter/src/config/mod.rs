//! Exporter config loader (strict parsing).

pub mod schema;

use std::fs;

use sockslens_core::error::{Result, SocksLensError};

pub use schema::{ExporterConfig, ExporterSection, MetricsSection};

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| SocksLensError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| SocksLensError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
