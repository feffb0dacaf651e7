//! Configuration management module
//!
//! Parses the command-line flags into a validated run configuration and
//! resolves which mode the invocation runs in.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::util::units::parse_size_spec;
use crate::{ProbeError, Result};

/// Raw command-line surface.
///
/// Count and interval are taken as strings on purpose: the accepted
/// grammars (`^[1-9][0-9]*$` and `^[0-9]+$`) are stricter than what an
/// integer parser lets through (`007`, `+5`).
#[derive(Debug, Parser)]
#[command(name = crate::APP_NAME, disable_version_flag = true)]
#[command(about = "NAS write-throughput probe and measurement-log summarizer")]
pub struct Cli {
    /// Size of each test file: bytes, or an integer with a K/M/G suffix (e.g. 256M)
    #[arg(short = 's', value_name = "SIZE")]
    pub size: Option<String>,

    /// Number of test files to write
    #[arg(short = 'n', value_name = "COUNT")]
    pub count: Option<String>,

    /// Seconds to pause between iterations
    #[arg(short = 'i', value_name = "SECONDS")]
    pub interval: Option<String>,

    /// Measurement log to append to
    #[arg(short = 'l', value_name = "LOG_PATH")]
    pub log: Option<PathBuf>,

    /// Directory to write test files into
    #[arg(short = 'd', value_name = "DIR", default_value = ".")]
    pub target_dir: PathBuf,

    /// Summarize this log; alone it is the only action, with the flags
    /// above the summary runs after the measurement loop
    #[arg(short = 'S', value_name = "LOG_PATH")]
    pub summary_log: Option<PathBuf>,
}

/// Parameters of a measurement run
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Size spec exactly as given on the command line
    pub size_spec: String,
    /// Resolved probe file size in bytes
    pub size_bytes: u64,
    /// Number of probe iterations
    pub max_files: u32,
    /// Pause between iterations
    pub interval: Duration,
    /// Measurement log path
    pub log_path: PathBuf,
    /// Directory the probe files are written into
    pub target_dir: PathBuf,
}

/// Validated run configuration.
///
/// The enum keeps the mode invariant unrepresentable: a run is either a
/// measurement (optionally followed by a summary) or summary-only, never
/// a partial mix of the two flag sets.
#[derive(Debug, Clone)]
pub enum RunConfig {
    /// Run the write prober, then optionally summarize
    Measure {
        probe: ProbeConfig,
        summary_log: Option<PathBuf>,
    },
    /// Only aggregate an existing log; no writes at all
    SummaryOnly { summary_log: PathBuf },
}

impl RunConfig {
    /// Validate the raw flags and resolve the run mode.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let measurement_flags_given = cli.size.is_some()
            || cli.count.is_some()
            || cli.interval.is_some()
            || cli.log.is_some();

        if !measurement_flags_given {
            return match cli.summary_log {
                Some(summary_log) => Ok(RunConfig::SummaryOnly { summary_log }),
                None => Err(ProbeError::ConfigError(
                    "nothing to do: give -s/-n/-i/-l for a measurement run or -S for a summary"
                        .to_string(),
                )),
            };
        }

        let size_spec = required(cli.size, "-s")?;
        let count = required(cli.count, "-n")?;
        let interval = required(cli.interval, "-i")?;
        let log_path = required(cli.log, "-l")?;

        let size_bytes = parse_size_spec(&size_spec)
            .map_err(|e| ProbeError::ConfigError(format!("-s: {}", e)))?;
        let max_files = parse_count(&count)?;
        let interval_secs = parse_interval(&interval)?;

        if !cli.target_dir.is_dir() {
            return Err(ProbeError::TargetDirError(format!(
                "{} does not exist or is not a directory",
                cli.target_dir.display()
            )));
        }

        Ok(RunConfig::Measure {
            probe: ProbeConfig {
                size_spec,
                size_bytes,
                max_files,
                interval: Duration::from_secs(interval_secs),
                log_path,
                target_dir: cli.target_dir,
            },
            summary_log: cli.summary_log,
        })
    }
}

fn required<T>(value: Option<T>, flag: &str) -> Result<T> {
    value.ok_or_else(|| {
        ProbeError::ConfigError(format!("{} is required in measurement mode", flag))
    })
}

/// `-n` grammar: `^[1-9][0-9]*$`
fn parse_count(input: &str) -> Result<u32> {
    let valid = !input.is_empty()
        && !input.starts_with('0')
        && input.chars().all(|c| c.is_ascii_digit());
    if !valid {
        return Err(ProbeError::ConfigError(format!(
            "-n: must be a positive integer, got {:?}",
            input
        )));
    }

    input.parse().map_err(|_| {
        ProbeError::ConfigError(format!("-n: value out of range: {}", input))
    })
}

/// `-i` grammar: `^[0-9]+$`
fn parse_interval(input: &str) -> Result<u64> {
    let valid = !input.is_empty() && input.chars().all(|c| c.is_ascii_digit());
    if !valid {
        return Err(ProbeError::ConfigError(format!(
            "-i: must be a non-negative integer, got {:?}",
            input
        )));
    }

    input.parse().map_err(|_| {
        ProbeError::ConfigError(format!("-i: value out of range: {}", input))
    })
}
