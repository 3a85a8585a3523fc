//! Shared error type across sockslens crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, SocksLensError>;

/// Unified error type used by the core facade and the exporter.
///
/// Only initialization can fail; every recording operation is total.
#[derive(Debug, Error)]
pub enum SocksLensError {
    /// A metric name was registered twice in the same registry. Fatal at
    /// startup: the process must not come up with an ambiguous export surface.
    #[error("duplicate metric registration: {0}")]
    DuplicateMetric(String),
    /// Instrument construction or registration failed for another reason
    /// (bad name, bad buckets).
    #[error("invalid metric: {0}")]
    InvalidMetric(String),
    /// Config file was malformed or failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Config schema version not supported by this binary.
    #[error("unsupported config version: {0}")]
    UnsupportedVersion(u32),
    #[error("internal: {0}")]
    Internal(String),
}

impl From<prometheus::Error> for SocksLensError {
    fn from(e: prometheus::Error) -> Self {
        match e {
            prometheus::Error::AlreadyReg => {
                SocksLensError::DuplicateMetric("already registered".into())
            }
            other => SocksLensError::InvalidMetric(other.to_string()),
        }
    }
}
