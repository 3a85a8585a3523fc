//! sockslens exporter library entry.
//!
//! This crate wires the instrumentation facade into an operational HTTP
//! surface: strict YAML config, shared application state, and the scrape
//! endpoint the metrics collector pulls from. It is intended to be consumed
//! by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod ops;
pub mod router;
