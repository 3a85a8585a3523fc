//! Top-level facade crate for sockslens.
//!
//! Re-exports the core instrumentation facade and the exporter library so
//! users can depend on a single crate.

pub mod core {
    pub use sockslens_core::*;
}

pub mod exporter {
    pub use sockslens_exporter::*;
}
