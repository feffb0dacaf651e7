//! Write prober module
//!
//! Runs the sequential create-write-measure-delete loop: one durable write
//! per iteration, one measurement record per attempt, and an unconditional
//! cleanup so the target directory returns to its pre-test state whatever
//! the outcome.

use std::io::ErrorKind;
use std::time::Instant;

use chrono::Utc;
use tokio::time::sleep;

use crate::config::ProbeConfig;
use crate::io::{FsStorage, ProbeStorage};
use crate::log::LogAppender;
use crate::models::{MeasurementRecord, ProbeStatus};
use crate::util::units::calculate_throughput_mbps;
use crate::{Result, PROBE_FILE_PREFIX};

/// Counts for a completed measurement run
#[derive(Debug, Clone, Copy)]
pub struct ProbeOutcome {
    /// Iterations executed
    pub attempted: u32,
    /// Iterations whose write reached stable storage
    pub succeeded: u32,
    /// Iterations that logged an ERROR record
    pub failed: u32,
}

/// Sequential write prober
pub struct WriteProber<S: ProbeStorage = FsStorage> {
    config: ProbeConfig,
    storage: S,
}

impl WriteProber<FsStorage> {
    /// Create a prober against the real filesystem.
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_storage(config, FsStorage::new())
    }
}

impl<S: ProbeStorage> WriteProber<S> {
    /// Create a prober with a custom storage backend.
    pub fn with_storage(config: ProbeConfig, storage: S) -> Self {
        Self { config, storage }
    }

    /// Execute the measurement loop, appending one record per iteration.
    ///
    /// A failed iteration is logged with status ERROR and a stderr warning,
    /// then the loop continues; only log-append failures abort the run.
    pub async fn run(&self, appender: &mut LogAppender) -> Result<ProbeOutcome> {
        let pb = indicatif::ProgressBar::new(self.config.max_files as u64);
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner} {pos}/{len} probes {msg}")
                .unwrap(),
        );

        let mut outcome = ProbeOutcome {
            attempted: 0,
            succeeded: 0,
            failed: 0,
        };

        for iteration in 1..=self.config.max_files {
            let timestamp = Utc::now();
            let file_name = format!(
                "{}{}_{:04}.dat",
                PROBE_FILE_PREFIX,
                timestamp.format("%Y%m%d%H%M%S"),
                iteration
            );
            let probe_path = self.config.target_dir.join(file_name);

            let started = Instant::now();
            let write_result = self
                .storage
                .write_durable(&probe_path, self.config.size_bytes);
            let duration = started.elapsed();

            // The target directory must return to its pre-test state even
            // when the write failed; a file that never appeared is fine.
            if let Err(e) = std::fs::remove_file(&probe_path) {
                if e.kind() != ErrorKind::NotFound {
                    warn(
                        &pb,
                        format!(
                            "warning: could not remove probe file {}: {}",
                            probe_path.display(),
                            e
                        ),
                    );
                }
            }

            let record = match &write_result {
                Ok(()) => MeasurementRecord {
                    timestamp,
                    status: ProbeStatus::Ok,
                    iteration,
                    size_spec: self.config.size_spec.clone(),
                    size_bytes: self.config.size_bytes,
                    duration_secs: duration.as_secs_f64(),
                    throughput_mbps: calculate_throughput_mbps(self.config.size_bytes, duration),
                    message: "ok".to_string(),
                },
                Err(e) => MeasurementRecord {
                    timestamp,
                    status: ProbeStatus::Error,
                    iteration,
                    size_spec: self.config.size_spec.clone(),
                    size_bytes: self.config.size_bytes,
                    duration_secs: duration.as_secs_f64(),
                    throughput_mbps: None,
                    message: format!("write failed: {}", e),
                },
            };

            appender.append(&record)?;
            outcome.attempted += 1;

            match write_result {
                Ok(()) => {
                    outcome.succeeded += 1;
                    if let Some(t) = record.throughput_mbps {
                        pb.set_message(format!("{:.1} MB/s", t));
                    }
                }
                Err(e) => {
                    outcome.failed += 1;
                    warn(
                        &pb,
                        format!(
                            "warning: iteration {} failed: {}; see {} for details",
                            iteration,
                            e,
                            appender.path().display()
                        ),
                    );
                }
            }
            pb.inc(1);

            // The last iteration never sleeps
            if iteration != self.config.max_files && !self.config.interval.is_zero() {
                sleep(self.config.interval).await;
            }
        }

        pb.finish_and_clear();
        Ok(outcome)
    }
}

/// Warnings go through the bar when it is drawn; a hidden bar would
/// swallow them, so fall back to plain stderr.
fn warn(pb: &indicatif::ProgressBar, message: String) {
    if pb.is_hidden() {
        eprintln!("{}", message);
    } else {
        pb.println(message);
    }
}
