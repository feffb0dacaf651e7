//! End-to-end exercises of the prober and summarizer through the library.

use nasprobe::config::ProbeConfig;
use nasprobe::log::{summarize_log, LogAppender};
use nasprobe::models::{MeasurementRecord, ProbeStatus};
use nasprobe::probe::WriteProber;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

fn probe_config(target_dir: PathBuf, log_path: PathBuf, max_files: u32) -> ProbeConfig {
    ProbeConfig {
        size_spec: "4K".to_string(),
        size_bytes: 4096,
        max_files,
        interval: Duration::ZERO,
        log_path,
        target_dir,
    }
}

#[tokio::test]
async fn test_full_run_then_summary_round_trip() {
    let temp_dir = tempdir().unwrap();
    let log_path = temp_dir.path().join("probe.log");
    let config = probe_config(temp_dir.path().to_path_buf(), log_path.clone(), 3);

    let mut appender = LogAppender::open(&log_path).unwrap();
    let outcome = WriteProber::new(config).run(&mut appender).await.unwrap();
    assert_eq!(outcome.attempted, 3);
    assert_eq!(outcome.succeeded, 3);

    let report = summarize_log(&log_path).unwrap();
    assert_eq!(report.sample_count, 3);
    assert_eq!(report.success_count, 3);
    assert_eq!(report.failure_count, 0);
    assert_eq!(report.total_bytes_success, 3 * 4096);
    assert_eq!(report.malformed_lines, 0);
    assert!(report.total_duration_secs > 0.0);
    assert!(report.min_duration_secs.unwrap() <= report.max_duration_secs.unwrap());
    assert!(report.avg_throughput_mbps > 0.0);
}

#[tokio::test]
async fn test_every_appended_field_survives_the_summarizer_parse() {
    let temp_dir = tempdir().unwrap();
    let log_path = temp_dir.path().join("probe.log");
    let config = probe_config(temp_dir.path().to_path_buf(), log_path.clone(), 2);

    let mut appender = LogAppender::open(&log_path).unwrap();
    WriteProber::new(config).run(&mut appender).await.unwrap();

    let content = std::fs::read_to_string(&log_path).unwrap();
    for line in content.lines() {
        let record = MeasurementRecord::from_line(line).expect("appender output must parse");
        assert_eq!(record.status, ProbeStatus::Ok);
        assert_eq!(record.size_spec, "4K");
        assert_eq!(record.size_bytes, 4096);
        // Re-serializing the parsed record reproduces the line exactly
        assert_eq!(record.to_line(), line);
    }
}

#[test]
fn test_summary_only_touches_nothing_but_the_log() {
    let temp_dir = tempdir().unwrap();
    let log_path = temp_dir.path().join("probe.log");
    std::fs::write(
        &log_path,
        "2024-03-01T12:00:00.000000Z\tstatus=OK\titeration=1\tsize=1M (1048576 bytes)\t\
         duration_s=1.000000\tthroughput_MBps=1.00\tok\n",
    )
    .unwrap();

    let mut listing_before: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    listing_before.sort();
    let content_before = std::fs::read_to_string(&log_path).unwrap();

    let report = summarize_log(&log_path).unwrap();
    assert_eq!(report.sample_count, 1);

    let mut listing_after: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    listing_after.sort();
    assert_eq!(listing_before, listing_after);
    assert_eq!(content_before, std::fs::read_to_string(&log_path).unwrap());
}
