//! Streaming log summarizer
//!
//! Folds a measurement log into aggregate statistics one line at a time,
//! so multi-gigabyte logs from long monitoring periods never have to fit
//! in memory. Lines that do not match the record schema are skipped and
//! counted rather than zero-filled.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::models::{MeasurementRecord, ProbeStatus};
use crate::util::units::format_bytes;
use crate::{ProbeError, Result};

/// Running aggregates threaded through the fold over log lines
#[derive(Debug, Default)]
struct SummaryAccumulator {
    entries: u64,
    successes: u64,
    failures: u64,
    total_duration_secs: f64,
    total_bytes_success: u64,
    total_throughput_mbps: f64,
    // Option keeps "no entries yet" distinct from a true 0.0s duration
    min_duration_secs: Option<f64>,
    max_duration_secs: Option<f64>,
    malformed_lines: u64,
}

impl SummaryAccumulator {
    fn observe(&mut self, record: &MeasurementRecord) {
        self.entries += 1;
        self.total_duration_secs += record.duration_secs;

        let d = record.duration_secs;
        self.min_duration_secs = Some(self.min_duration_secs.map_or(d, |m| m.min(d)));
        self.max_duration_secs = Some(self.max_duration_secs.map_or(d, |m| m.max(d)));

        match record.status {
            ProbeStatus::Ok => {
                self.successes += 1;
                self.total_bytes_success += record.size_bytes;
                self.total_throughput_mbps += record.throughput_mbps.unwrap_or(0.0);
            }
            ProbeStatus::Error => self.failures += 1,
        }
    }

    fn observe_malformed(&mut self) {
        self.malformed_lines += 1;
    }

    fn finish(self) -> SummaryReport {
        let avg_duration_secs = if self.entries > 0 {
            self.total_duration_secs / self.entries as f64
        } else {
            0.0
        };
        let avg_throughput_mbps = if self.successes > 0 {
            self.total_throughput_mbps / self.successes as f64
        } else {
            0.0
        };

        SummaryReport {
            sample_count: self.entries,
            success_count: self.successes,
            failure_count: self.failures,
            total_bytes_success: self.total_bytes_success,
            total_duration_secs: self.total_duration_secs,
            min_duration_secs: self.min_duration_secs,
            max_duration_secs: self.max_duration_secs,
            avg_duration_secs,
            avg_throughput_mbps,
            malformed_lines: self.malformed_lines,
        }
    }
}

/// Aggregate statistics over one log file; derived, never persisted
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub sample_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    /// Bytes written by successful iterations
    pub total_bytes_success: u64,
    /// Sum of durations across all entries, OK and ERROR alike
    pub total_duration_secs: f64,
    pub min_duration_secs: Option<f64>,
    pub max_duration_secs: Option<f64>,
    pub avg_duration_secs: f64,
    /// Mean of the per-entry throughputs of successful iterations
    pub avg_throughput_mbps: f64,
    /// Lines that did not match the record schema
    pub malformed_lines: u64,
}

impl SummaryReport {
    /// Render the human-oriented text report.
    pub fn render(&self) -> String {
        if self.sample_count == 0 {
            let mut out = "no entries found".to_string();
            if self.malformed_lines > 0 {
                out.push_str(&format!(
                    " ({} malformed line(s) skipped)",
                    self.malformed_lines
                ));
            }
            return out;
        }

        let mut out = format!(
            "Samples:              {} ({} OK, {} ERROR)\n\
             Data written (OK):    {} ({} bytes)\n\
             Total duration:       {:.6} s\n\
             Duration min/avg/max: {:.6} / {:.6} / {:.6} s\n\
             Avg throughput (OK):  {:.2} MB/s",
            self.sample_count,
            self.success_count,
            self.failure_count,
            format_bytes(self.total_bytes_success),
            self.total_bytes_success,
            self.total_duration_secs,
            self.min_duration_secs.unwrap_or(0.0),
            self.avg_duration_secs,
            self.max_duration_secs.unwrap_or(0.0),
            self.avg_throughput_mbps,
        );
        if self.malformed_lines > 0 {
            out.push_str(&format!(
                "\nSkipped:              {} malformed line(s)",
                self.malformed_lines
            ));
        }
        out
    }
}

/// Stream `path` and fold it into a [`SummaryReport`].
///
/// Fails with [`ProbeError::LogNotFound`] when the path does not reference
/// an existing file. Blank lines are ignored; anything else that fails to
/// parse is counted as malformed.
pub fn summarize_log(path: &Path) -> Result<SummaryReport> {
    if !path.is_file() {
        return Err(ProbeError::LogNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut acc = SummaryAccumulator::default();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match MeasurementRecord::from_line(&line) {
            Some(record) => acc.observe(&record),
            None => acc.observe_malformed(),
        }
    }

    Ok(acc.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::io::Write;
    use tempfile::tempdir;

    fn record(
        status: ProbeStatus,
        duration_secs: f64,
        size_bytes: u64,
        throughput_mbps: Option<f64>,
    ) -> MeasurementRecord {
        MeasurementRecord {
            timestamp: Utc::now(),
            status,
            iteration: 1,
            size_spec: size_bytes.to_string(),
            size_bytes,
            duration_secs,
            throughput_mbps,
            message: "ok".to_string(),
        }
    }

    fn write_log(lines: &[String]) -> (tempfile::TempDir, std::path::PathBuf) {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("probe.log");
        let mut file = File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        (temp_dir, path)
    }

    #[test]
    fn test_missing_log_file() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("gone.log");

        let err = summarize_log(&missing).unwrap_err();
        assert!(matches!(err, ProbeError::LogNotFound(_)));
    }

    #[test]
    fn test_empty_log_reports_no_entries() {
        let (_guard, path) = write_log(&[]);

        let report = summarize_log(&path).unwrap();
        assert_eq!(report.sample_count, 0);
        assert_eq!(report.min_duration_secs, None);
        assert!(report.render().contains("no entries found"));
    }

    #[test]
    fn test_irrelevant_lines_count_as_malformed() {
        let (_guard, path) = write_log(&[
            "some unrelated text".to_string(),
            String::new(),
            "key=value\tmore".to_string(),
        ]);

        let report = summarize_log(&path).unwrap();
        assert_eq!(report.sample_count, 0);
        assert_eq!(report.malformed_lines, 2);
        assert!(report.render().contains("no entries found"));
    }

    #[test]
    fn test_aggregates_match_expected_values() {
        let (_guard, path) = write_log(&[
            record(ProbeStatus::Ok, 1.0, 1048576, Some(1.0)).to_line(),
            record(ProbeStatus::Ok, 3.0, 2097152, Some(2.0 / 3.0)).to_line(),
            record(ProbeStatus::Error, 0.5, 1048576, None).to_line(),
        ]);

        let report = summarize_log(&path).unwrap();
        assert_eq!(report.sample_count, 3);
        assert_eq!(report.success_count, 2);
        assert_eq!(report.failure_count, 1);
        assert_eq!(report.total_bytes_success, 3 * 1048576);
        assert!((report.total_duration_secs - 4.5).abs() < 1e-9);
        assert!((report.avg_duration_secs - 1.5).abs() < 1e-9);
        assert_eq!(report.min_duration_secs, Some(0.5));
        assert_eq!(report.max_duration_secs, Some(3.0));
        // Mean of the written per-entry throughputs, 2 decimals each
        assert!((report.avg_throughput_mbps - (1.0 + 0.67) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_is_a_valid_minimum() {
        let (_guard, path) = write_log(&[
            record(ProbeStatus::Ok, 0.0, 1024, None).to_line(),
            record(ProbeStatus::Ok, 2.0, 1024, Some(0.0)).to_line(),
        ]);

        let report = summarize_log(&path).unwrap();
        assert_eq!(report.min_duration_secs, Some(0.0));
        assert_eq!(report.max_duration_secs, Some(2.0));
    }

    #[test]
    fn test_malformed_lines_do_not_poison_aggregates() {
        let (_guard, path) = write_log(&[
            record(ProbeStatus::Ok, 1.0, 1048576, Some(1.0)).to_line(),
            "corrupted line".to_string(),
            record(ProbeStatus::Ok, 1.0, 1048576, Some(1.0)).to_line(),
        ]);

        let report = summarize_log(&path).unwrap();
        assert_eq!(report.sample_count, 2);
        assert_eq!(report.malformed_lines, 1);
        assert!(report.render().contains("malformed"));
    }

    #[test]
    fn test_render_lists_all_aggregates() {
        let (_guard, path) = write_log(&[
            record(ProbeStatus::Ok, 1.0, 1048576, Some(1.0)).to_line(),
            record(ProbeStatus::Error, 0.5, 1048576, None).to_line(),
        ]);

        let rendered = summarize_log(&path).unwrap().render();
        assert!(rendered.contains("2 (1 OK, 1 ERROR)"));
        assert!(rendered.contains("1048576 bytes"));
        assert!(rendered.contains("Total duration:       1.500000 s"));
        assert!(rendered.contains("0.500000 / 0.750000 / 1.000000 s"));
        assert!(rendered.contains("1.00 MB/s"));
    }
}
