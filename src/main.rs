//! CLI entry point for the grade averages tool.
//!
//! Reads the first sheet of a grade spreadsheet (local file or URL), computes
//! the weighted average of every subject and prints them alphabetically.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grade_averages::grades::{TracingSink, process};
use grade_averages::output::{append_records, subject_reports, write_json, write_report};
use grade_averages::source::load_sheet;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_SOURCE: &str = "PodepsaniHodnoceni.xlsx";

#[derive(Parser)]
#[command(name = "grade_averages")]
#[command(about = "Compute per-subject weighted grade averages from a spreadsheet", long_about = None)]
struct Cli {
    /// Spreadsheet path or URL (defaults to $GRADES_FILE, then PodepsaniHodnoceni.xlsx)
    #[arg(value_name = "FILE_OR_URL")]
    source: Option<String>,

    /// Output format for the averages
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Optional: CSV file to append the averages to
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/grade_averages.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("grade_averages.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let source = cli
        .source
        .or_else(|| std::env::var("GRADES_FILE").ok())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

    let sheet = load_sheet(&source)
        .await
        .with_context(|| format!("Error processing grades from {source}"))?;
    info!(sheet = %sheet.sheet_name, rows = sheet.rows.len(), "Processing first sheet");

    let mut sink = TracingSink::default();
    let subjects = process(&sheet.rows, &mut sink).context("Error processing grades")?;

    if sink.skipped_rows > 0 || sink.zero_averages > 0 {
        warn!(
            skipped_rows = sink.skipped_rows,
            zero_averages = sink.zero_averages,
            "Some grade data was ignored"
        );
    }
    info!(subjects = subjects.len(), "Averages computed");

    let reports = subject_reports(&subjects);

    let mut stdout = std::io::stdout().lock();
    match cli.format {
        Format::Text => write_report(&mut stdout, &reports)?,
        Format::Json => write_json(&mut stdout, &reports)?,
    }

    if let Some(path) = cli.output {
        append_records(&path, &source, &reports)
            .with_context(|| format!("Failed to append averages to {path}"))?;
        info!(path = %path, "Averages appended");
    }

    Ok(())
}
