//! Units parsing and formatting utilities
//!
//! Provides the size-spec parser used by the `-s` flag, human-readable
//! byte formatting for the summary report, and the throughput calculation
//! shared by the prober and the summarizer.

use std::time::Duration;

/// Parse a size spec into bytes.
///
/// Accepts a plain byte count or an integer with a single K/M/G suffix
/// (case-insensitive, binary multiplier 1024). Anything else is rejected.
///
/// # Examples
/// ```
/// use nasprobe::util::units::parse_size_spec;
///
/// assert_eq!(parse_size_spec("4096").unwrap(), 4096);
/// assert_eq!(parse_size_spec("256M").unwrap(), 256 * 1024 * 1024);
/// assert_eq!(parse_size_spec("1g").unwrap(), 1024 * 1024 * 1024);
/// ```
pub fn parse_size_spec(input: &str) -> Result<u64, String> {
    let input = input.trim();

    if input.is_empty() {
        return Err("size spec is empty".to_string());
    }

    let (number_part, multiplier) = match input.chars().last() {
        Some(c) if c.is_ascii_digit() => (input, 1u64),
        Some(c) => {
            let number = &input[..input.len() - c.len_utf8()];
            let multiplier = match c.to_ascii_uppercase() {
                'K' => 1024u64,
                'M' => 1024u64 * 1024,
                'G' => 1024u64 * 1024 * 1024,
                _ => return Err(format!("unknown size suffix: {}", c)),
            };
            (number, multiplier)
        }
        None => return Err("size spec is empty".to_string()),
    };

    if number_part.is_empty() || !number_part.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid size number: {}", number_part));
    }

    let number: u64 = number_part
        .parse()
        .map_err(|_| format!("invalid size number: {}", number_part))?;

    let bytes = number
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size spec overflows: {}", input))?;

    if bytes == 0 {
        return Err("size must be greater than 0".to_string());
    }

    Ok(bytes)
}

/// Format bytes into human-readable size with appropriate units
///
/// # Examples
/// ```
/// use nasprobe::util::units::format_bytes;
///
/// assert_eq!(format_bytes(1024), "1.0 KiB");
/// assert_eq!(format_bytes(1048576), "1.0 MiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Calculate throughput in MB/s from bytes and duration
///
/// Returns `None` for a zero duration, where the rate is undefined.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use nasprobe::util::units::calculate_throughput_mbps;
///
/// let throughput = calculate_throughput_mbps(1048576, Duration::from_secs(1)).unwrap();
/// assert!((throughput - 1.0).abs() < 0.01);
/// ```
pub fn calculate_throughput_mbps(bytes: u64, duration: Duration) -> Option<f64> {
    if duration.is_zero() {
        return None;
    }

    let megabytes = bytes as f64 / 1_048_576.0; // 1 MiB = 1,048,576 bytes
    Some(megabytes / duration.as_secs_f64())
}
