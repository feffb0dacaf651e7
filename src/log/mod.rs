//! Measurement log module
//!
//! The log file is the tool's sole persistent state: an ordered,
//! append-only sequence of tab-separated measurement lines. This module
//! holds the appender that writes it and the streaming summarizer that
//! aggregates it.

pub mod appender;
pub mod summary;

// Re-export commonly used types
pub use appender::LogAppender;
pub use summary::{summarize_log, SummaryReport};
