//! Local-file input loading for the CLI harness.
//!
//! The engines require their input fully materialized before they run; this
//! module is the caller-side fan-out that gets it there. Shard files load
//! concurrently under a bounded semaphore; the summary index loads from one
//! JSON mapping file or a directory of per-day files.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tripquery::Record;
use tripquery::rollup::types::DailySummary;

/// Loads every shard file into one ordered record collection. Files load
/// concurrently but records keep shard-argument order.
pub async fn load_records(paths: &[String], concurrency: usize) -> Result<Vec<Record>> {
    let semaphore = Arc::new(tokio::sync::Semaphore::new(concurrency.max(1)));

    let mut tasks = Vec::new();
    for path in paths {
        let sem = semaphore.clone();
        let path = path.clone();
        tasks.push(tokio::spawn(async move {
            let _permit = sem.acquire().await?;
            load_shard(&path)
        }));
    }

    let mut records = Vec::new();
    for task in tasks {
        records.extend(task.await??);
    }

    info!(shards = paths.len(), records = records.len(), "Shards loaded");
    Ok(records)
}

/// Loads one shard file: a JSON array of record objects, or a CSV whose
/// cells load as strings.
fn load_shard(path: &str) -> Result<Vec<Record>> {
    debug!(path, "Loading shard");
    let records = match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some("csv") => load_csv_shard(path)?,
        _ => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading shard {path}"))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("shard {path} is not a JSON array of records"))?
        }
    };
    Ok(records)
}

fn load_csv_shard(path: &str) -> Result<Vec<Record>> {
    let mut rdr = csv::Reader::from_path(path).with_context(|| format!("reading shard {path}"))?;
    let headers = rdr.headers()?.clone();

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let mut record = Record::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            record.insert(header.to_string(), Value::from(cell));
        }
        records.push(record);
    }
    Ok(records)
}

/// Loads the daily-summary index: either a single JSON object mapping ISO
/// date → summary, or a directory of `<YYYY-MM-DD>.json` files.
pub fn load_summaries(path: &str) -> Result<BTreeMap<String, DailySummary>> {
    let meta =
        std::fs::metadata(path).with_context(|| format!("reading summary index {path}"))?;

    if meta.is_file() {
        let raw = std::fs::read_to_string(path)?;
        return serde_json::from_str(&raw)
            .with_context(|| format!("summary index {path} is not a date-to-summary mapping"));
    }

    let mut summaries = BTreeMap::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let file = entry.path();
        if file.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(date) = file.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let raw = std::fs::read_to_string(&file)?;
        let summary: DailySummary = serde_json::from_str(&raw)
            .with_context(|| format!("summary file {} is malformed", file.display()))?;
        summaries.insert(date.to_string(), summary);
    }

    if summaries.is_empty() {
        bail!("summary index {path} contains no .json summaries");
    }
    info!(days = summaries.len(), "Summary index loaded");
    Ok(summaries)
}
