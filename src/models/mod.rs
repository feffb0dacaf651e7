//! Measurement data models
//!
//! Contains the per-iteration measurement record and its tab-separated
//! log-line serialization.

pub mod record;

// Re-export commonly used types
pub use record::{MeasurementRecord, ProbeStatus};
