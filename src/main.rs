use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use nasprobe::config::{Cli, RunConfig};
use nasprobe::log::{summarize_log, LogAppender};
use nasprobe::probe::WriteProber;
use nasprobe::util::units::format_bytes;
use nasprobe::{ProbeError, APP_NAME};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // -h lands here too; only genuine usage errors are failures
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let config = match RunConfig::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", APP_NAME, e);
            if matches!(e, ProbeError::ConfigError(_)) {
                eprintln!("{}", Cli::command().render_usage());
            }
            return ExitCode::from(1);
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", APP_NAME, e);
            ExitCode::from(1)
        }
    }
}

async fn run(config: RunConfig) -> nasprobe::Result<()> {
    match config {
        RunConfig::Measure { probe, summary_log } => {
            let mut appender = LogAppender::open(&probe.log_path)?;

            println!(
                "Probing {} with {} x {} ({} bytes) files",
                probe.target_dir.display(),
                probe.max_files,
                format_bytes(probe.size_bytes),
                probe.size_bytes
            );

            let outcome = WriteProber::new(probe).run(&mut appender).await?;
            println!(
                "Completed {} probes ({} OK, {} ERROR)",
                outcome.attempted, outcome.succeeded, outcome.failed
            );

            if let Some(summary_log) = summary_log {
                print_summary(&summary_log)?;
            }
            Ok(())
        }
        RunConfig::SummaryOnly { summary_log } => print_summary(&summary_log),
    }
}

fn print_summary(path: &std::path::Path) -> nasprobe::Result<()> {
    let report = summarize_log(path)?;
    println!("Summary of {}:", path.display());
    println!("{}", report.render());
    Ok(())
}
