//! Per-iteration measurement record
//!
//! One record is produced per probe iteration and serialized as a single
//! tab-separated log line. Field order and names are a compatibility
//! contract for downstream log-reading tooling:
//!
//! `timestamp\tstatus=X\titeration=N\tsize=SPEC (BYTES bytes)\tduration_s=D\tthroughput_MBps=T\tmessage`

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;

/// Outcome of a single probe iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// Write completed and was synced to stable storage
    Ok,
    /// Write failed; the record's message carries the error text
    Error,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Ok => write!(f, "OK"),
            ProbeStatus::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for ProbeStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(ProbeStatus::Ok),
            "ERROR" => Ok(ProbeStatus::Error),
            _ => Err(()),
        }
    }
}

/// A single probe measurement, created once per iteration and appended to
/// the log immediately, never mutated afterward.
#[derive(Debug, Clone)]
pub struct MeasurementRecord {
    /// Wall-clock timestamp taken at the start of the iteration
    pub timestamp: DateTime<Utc>,
    /// Outcome of the write attempt
    pub status: ProbeStatus,
    /// 1-based iteration index within the run
    pub iteration: u32,
    /// Size spec exactly as the user gave it (e.g. `256M`)
    pub size_spec: String,
    /// Resolved probe file size in bytes
    pub size_bytes: u64,
    /// Elapsed wall time of the durable write, in seconds
    pub duration_secs: f64,
    /// Measured rate in MB/s; `None` when the write failed or the
    /// duration was zero
    pub throughput_mbps: Option<f64>,
    /// Free-text detail; error text for failed iterations
    pub message: String,
}

/// Number of tab-separated fields in a serialized record
const FIELD_COUNT: usize = 7;

impl MeasurementRecord {
    /// Serialize the record as one log line, without a trailing newline.
    pub fn to_line(&self) -> String {
        let throughput = match self.throughput_mbps {
            Some(t) => format!("{:.2}", t),
            None => "-".to_string(),
        };

        format!(
            "{}\tstatus={}\titeration={}\tsize={} ({} bytes)\tduration_s={:.6}\tthroughput_MBps={}\t{}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            self.status,
            self.iteration,
            sanitize(&self.size_spec),
            self.size_bytes,
            self.duration_secs,
            throughput,
            sanitize(&self.message),
        )
    }

    /// Parse a log line back into a record.
    ///
    /// Returns `None` for anything that does not match the fixed schema;
    /// callers treat such lines as malformed rather than zero-filling.
    pub fn from_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != FIELD_COUNT {
            return None;
        }

        let timestamp = DateTime::parse_from_rfc3339(fields[0])
            .ok()?
            .with_timezone(&Utc);
        let status: ProbeStatus = field_value(fields[1], "status")?.parse().ok()?;
        let iteration: u32 = field_value(fields[2], "iteration")?.parse().ok()?;
        let (size_spec, size_bytes) = parse_size_field(fields[3])?;
        let duration_secs: f64 = field_value(fields[4], "duration_s")?.parse().ok()?;
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return None;
        }

        let throughput_mbps = match field_value(fields[5], "throughput_MBps")? {
            "-" => None,
            value => Some(value.parse().ok()?),
        };

        Some(Self {
            timestamp,
            status,
            iteration,
            size_spec,
            size_bytes,
            duration_secs,
            throughput_mbps,
            message: fields[6].to_string(),
        })
    }
}

/// Extract the value of a `key=value` field, checking the key.
fn field_value<'a>(field: &'a str, key: &str) -> Option<&'a str> {
    let (k, v) = field.split_once('=')?;
    if k == key {
        Some(v)
    } else {
        None
    }
}

/// Parse the `size=SPEC (BYTES bytes)` field into spec text and byte count.
fn parse_size_field(field: &str) -> Option<(String, u64)> {
    let value = field_value(field, "size")?;
    let (spec, rest) = value.split_once(" (")?;
    let bytes_text = rest.strip_suffix(" bytes)")?;
    let bytes: u64 = bytes_text.parse().ok()?;
    Some((spec.to_string(), bytes))
}

/// Keep free-text fields from breaking the tab-separated schema.
fn sanitize(text: &str) -> String {
    text.replace(['\t', '\n', '\r'], " ")
}
