//! Append-only log writer
//!
//! Lines are never rewritten; each record goes out as a single write of
//! the whole line so concurrent external readers never observe a partial
//! line.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::MeasurementRecord;
use crate::{ProbeError, Result};

/// Writer for the measurement log
#[derive(Debug)]
pub struct LogAppender {
    path: PathBuf,
    file: File,
}

impl LogAppender {
    /// Open the log for appending, creating the parent directory and an
    /// empty log file if either is absent.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ProbeError::LogError(format!(
                        "failed to create log directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| {
                ProbeError::LogError(format!("failed to open log {}: {}", path.display(), e))
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Append one record as a single line.
    pub fn append(&mut self, record: &MeasurementRecord) -> Result<()> {
        let mut line = record.to_line();
        line.push('\n');

        // One write_all per line keeps the append atomic at line level
        // under O_APPEND.
        self.file.write_all(line.as_bytes()).map_err(|e| {
            ProbeError::LogError(format!(
                "failed to append to log {}: {}",
                self.path.display(),
                e
            ))
        })?;
        self.file.flush().map_err(|e| {
            ProbeError::LogError(format!("failed to flush log {}: {}", self.path.display(), e))
        })
    }

    /// Path of the log this appender writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
