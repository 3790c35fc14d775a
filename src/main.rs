//! CLI entry point for the tripquery engine.
//!
//! Provides subcommands for running a record query plan over shard files and
//! a rollup plan over a daily-summary index, emitting result rows as JSON.

mod loader;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use tripquery::diag::TracingSink;
use tripquery::output::{print_rows, write_rows};
use tripquery::pipeline::run_record_plan;
use tripquery::plan::{RecordPlan, RollupPlan};
use tripquery::rollup::run_rollup_plan;

#[derive(Parser)]
#[command(name = "tripquery")]
#[command(about = "Run analytical query plans over trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a record query plan over one or more shard files
    Query {
        /// Shard files (JSON arrays of trip records, or CSV)
        #[arg(value_name = "SHARD", required = true)]
        shards: Vec<String>,

        /// Path to the record query plan JSON
        #[arg(short, long)]
        plan: String,

        /// File to write result rows to (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Maximum number of shard files loaded concurrently
        #[arg(short, long, default_value_t = 5)]
        concurrency: usize,
    },
    /// Run a rollup plan over a daily-summary index
    Rollup {
        /// Summary index: a JSON mapping file or a directory of per-day files
        #[arg(value_name = "INDEX")]
        index: String,

        /// Path to the rollup plan JSON
        #[arg(short, long)]
        plan: String,

        /// File to write result rows to (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/tripquery.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("tripquery.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            shards,
            plan,
            output,
            concurrency,
        } => {
            let plan: RecordPlan = read_plan(&plan)?;
            let records = loader::load_records(&shards, concurrency).await?;

            let rows = run_record_plan(&records, &plan, &TracingSink);
            info!(rows = rows.len(), "Record plan complete");

            emit(&rows, output.as_deref())?;
        }
        Commands::Rollup {
            index,
            plan,
            output,
        } => {
            let plan: RollupPlan = read_plan(&plan)?;
            let summaries = loader::load_summaries(&index)?;

            let rows = run_rollup_plan(&summaries, &plan, &TracingSink);
            info!(rows = rows.len(), "Rollup plan complete");

            emit(&rows, output.as_deref())?;
        }
    }

    Ok(())
}

/// Reads and deserializes a plan file. A plan whose top-level shape doesn't
/// match is the one hard failure the engines don't absorb.
fn read_plan<P: serde::de::DeserializeOwned>(path: &str) -> Result<P> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading plan {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("plan {path} has the wrong shape"))
}

fn emit(rows: &[tripquery::Record], output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            write_rows(path, rows)?;
            info!(path, "Result rows written");
        }
        None => print_rows(rows)?,
    }
    Ok(())
}
