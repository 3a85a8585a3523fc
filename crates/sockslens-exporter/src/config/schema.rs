use std::time::Duration;

use serde::Deserialize;
use sockslens_core::error::{Result, SocksLensError};
use sockslens_core::{LabelMode, MetricsConfig};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SocksLensError::UnsupportedVersion(self.version));
        }
        self.metrics.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Which dimension the per-request series are keyed by:
    /// `constant`, `client_ip`, or `remote_addr`.
    #[serde(default = "default_label_mode")]
    pub label_mode: LabelMode,

    /// Tag used when `label_mode` is `constant`.
    #[serde(default = "default_constant_value")]
    pub constant_value: String,

    /// Rolling window for summary quantiles, in seconds.
    #[serde(default = "default_summary_max_age_secs")]
    pub summary_max_age_secs: u64,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            label_mode: default_label_mode(),
            constant_value: default_constant_value(),
            summary_max_age_secs: default_summary_max_age_secs(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() {
            return Err(SocksLensError::InvalidConfig(
                "metrics.namespace must not be empty".into(),
            ));
        }
        if self.label_mode == LabelMode::Constant && self.constant_value.is_empty() {
            return Err(SocksLensError::InvalidConfig(
                "metrics.constant_value must not be empty in constant mode".into(),
            ));
        }
        if !(60..=86400).contains(&self.summary_max_age_secs) {
            return Err(SocksLensError::InvalidConfig(
                "metrics.summary_max_age_secs must be between 60 and 86400".into(),
            ));
        }
        Ok(())
    }

    /// Translate the parsed section into the facade's own config type.
    pub fn to_metrics_config(&self) -> MetricsConfig {
        MetricsConfig {
            namespace: self.namespace.clone(),
            label_mode: self.label_mode,
            constant_value: self.constant_value.clone(),
            summary_max_age: Duration::from_secs(self.summary_max_age_secs),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:9150".into()
}
fn default_namespace() -> String {
    "sockslens".into()
}
fn default_label_mode() -> LabelMode {
    LabelMode::Constant
}
fn default_constant_value() -> String {
    "request".into()
}
fn default_summary_max_age_secs() -> u64 {
    3600
}
