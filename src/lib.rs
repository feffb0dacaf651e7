//! nasprobe - NAS write-throughput probe
//!
//! Repeatedly writes fixed-size test files to a target mount with durable
//! (fsync-backed) writes, records one tab-separated measurement line per
//! attempt in an append-only log, and can summarize such a log into
//! aggregate throughput and duration statistics.

use std::fmt;
use std::path::PathBuf;

// Public re-exports
pub mod config;
pub mod io;
pub mod log;
pub mod models;
pub mod probe;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum ProbeError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Flag validation or parsing error
    ConfigError(String),
    /// Target directory is missing or not a directory
    TargetDirError(String),
    /// Measurement log could not be opened or appended to
    LogError(String),
    /// Summarize was requested on a log that does not exist
    LogNotFound(PathBuf),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::IoError(err) => write!(f, "I/O error: {}", err),
            ProbeError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ProbeError::TargetDirError(msg) => write!(f, "Target directory error: {}", msg),
            ProbeError::LogError(msg) => write!(f, "Log error: {}", msg),
            ProbeError::LogNotFound(path) => {
                write!(f, "Log file not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        ProbeError::IoError(err)
    }
}

/// Result type alias for nasprobe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

// Common types and constants
pub const APP_NAME: &str = "nasprobe";
/// Prefix for probe files so stray leftovers are identifiable
pub const PROBE_FILE_PREFIX: &str = "NASPROBE_";
/// Chunk size for zero-fill probe writes
pub const WRITE_CHUNK_SIZE: usize = 1024 * 1024;
