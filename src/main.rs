//! CLI entry point for the report card generator.
//!
//! Reads a spreadsheet of student scores, validates it, aggregates scores
//! per student, and writes one PDF report card per student.
//!
//! Exit codes:
//!   0 - Normal completion (individual report failures are printed and
//!       skipped, not fatal)
//!   1 - Load or validation failure; no reports are produced

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use report_cards::summary::RunSummary;
use report_cards::{aggregate, loader, report, validate};
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "report_cards")]
#[command(about = "Generates per-student PDF report cards from a score spreadsheet", long_about = None)]
struct Cli {
    /// Score spreadsheet to read
    #[arg(short, long, default_value = loader::DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory the report cards are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));
    tracing_subscriber::registry().with(stderr_layer).init();

    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        println!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    info!(
        input = %cli.input.display(),
        out_dir = %cli.out_dir.display(),
        "Starting report card run"
    );

    let table = loader::load_table(&cli.input)?;
    let rows = validate::validate(&table)?;
    let records = aggregate::student_records(&rows);
    info!(rows = rows.len(), students = records.len(), "Input aggregated");

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create '{}'", cli.out_dir.display()))?;

    let mut written = 0usize;
    let mut failed = 0usize;
    for record in &records {
        match report::render_report(record, &cli.out_dir) {
            Ok(file_name) => {
                written += 1;
                println!("Report card generated: {file_name}");
            }
            Err(err) => {
                // One student's failure never aborts the batch.
                failed += 1;
                println!("Error generating report card for {}: {err:#}", record.name);
            }
        }
    }

    let summary = RunSummary {
        generated_at: Utc::now(),
        input_rows: rows.len(),
        students: records.len(),
        reports_written: written,
        reports_failed: failed,
    };
    info!(written, failed, "Run complete");
    if let Ok(json) = summary.to_json() {
        debug!("{json}");
    }

    Ok(())
}
