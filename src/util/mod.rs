//! Utility functions module
//!
//! Contains helper functions for size-spec parsing, units formatting,
//! and throughput calculation.

pub mod units;

// Re-export commonly used functions
pub use units::{calculate_throughput_mbps, format_bytes, parse_size_spec};
