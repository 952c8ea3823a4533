//! End-to-end pipeline for one job: index → plan → concurrent range transfer.
//!
//! The network and file work is blocking (libcurl easy handles, std threads),
//! so each stage runs under `tokio::task::spawn_blocking`.

use anyhow::{Context, Result};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::config::{JobSpec, Settings};
use crate::fetcher::FetchOptions;
use crate::index::{parse_index, IndexEntry};
use crate::selector::TransferPlan;
use crate::source;
use crate::transfer::{self, RangeDone, TransferReport};

/// A planned job, ready to execute.
#[derive(Debug, Clone)]
pub struct PreparedJob {
    /// Every record of the index, in index order.
    pub entries: Vec<IndexEntry>,
    pub plan: TransferPlan,
    /// Where the raw index was saved, when requested.
    pub saved_index: Option<PathBuf>,
}

/// Read and parse an index from a URL or a local file.
pub async fn load_index(location: &str, opts: &FetchOptions) -> Result<Vec<IndexEntry>> {
    let bytes = read_index_bytes(location, opts).await?;
    let entries = parse_index(Cursor::new(bytes))
        .with_context(|| format!("failed to parse index {}", location))?;
    tracing::info!(location, entries = entries.len(), "index parsed");
    Ok(entries)
}

async fn read_index_bytes(location: &str, opts: &FetchOptions) -> Result<Vec<u8>> {
    if source::is_remote(location) {
        let url = location.to_string();
        let opts = opts.clone();
        let bytes = tokio::task::spawn_blocking(move || source::fetch_index(&url, &opts))
            .await
            .context("index download task failed")??;
        Ok(bytes)
    } else {
        tokio::fs::read(location)
            .await
            .with_context(|| format!("failed to read index file {}", location))
    }
}

/// Destination path for a job: the job's `output` if set (relative paths are
/// taken relative to `output_dir`), else the archive's file name in `output_dir`.
pub fn resolve_output(job: &JobSpec, output_dir: &Path) -> Result<PathBuf> {
    if let Some(out) = &job.output {
        return Ok(output_dir.join(out));
    }
    let name = source::file_name_from_index_url(&job.idx_url)
        .with_context(|| format!("cannot derive a file name from {}", job.idx_url))?;
    Ok(output_dir.join(name))
}

/// Download the index, select the requested records and build the plan.
/// With `keep_index`, the raw index is also written next to the output as
/// `<output>.idx`.
pub async fn prepare(
    job: &JobSpec,
    settings: &Settings,
    destination: &Path,
    keep_index: bool,
) -> Result<PreparedJob> {
    let data_url = source::data_url(&job.idx_url)?;
    let bytes = read_index_bytes(&job.idx_url, &settings.index_fetch_options()).await?;

    let saved_index = if keep_index {
        let mut name = destination.as_os_str().to_owned();
        name.push(source::INDEX_SUFFIX);
        let path = PathBuf::from(name);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("failed to save index to {}", path.display()))?;
        Some(path)
    } else {
        None
    };

    let entries = parse_index(Cursor::new(bytes))
        .with_context(|| format!("failed to parse index {}", job.idx_url))?;
    let plan = TransferPlan::build(&data_url, destination, &entries, &job.parameters);
    tracing::info!(
        entries = entries.len(),
        ranges = plan.ranges().len(),
        total_size = plan.total_size(),
        "job planned"
    );
    Ok(PreparedJob {
        entries,
        plan,
        saved_index,
    })
}

/// Run the transfer for `plan`, forwarding per-range completions to `progress_tx`.
///
/// On failure the returned error wraps a [`transfer::TransferError`]; use
/// `downcast_ref` to reach the per-range details.
pub async fn execute(
    plan: TransferPlan,
    settings: &Settings,
    progress_tx: Option<tokio::sync::mpsc::Sender<RangeDone>>,
) -> Result<TransferReport> {
    let opts = settings.range_fetch_options();
    let report = tokio::task::spawn_blocking(move || {
        transfer::execute_with_progress(&plan, &opts, progress_tx.as_ref())
    })
    .await
    .context("transfer task failed")??;
    Ok(report)
}

/// `prepare` followed by `execute`, without progress reporting.
pub async fn run_job(
    job: &JobSpec,
    settings: &Settings,
    output_dir: &Path,
) -> Result<(PreparedJob, TransferReport)> {
    let destination = resolve_output(job, output_dir)?;
    let prepared = prepare(job, settings, &destination, false).await?;
    let report = execute(prepared.plan.clone(), settings, None).await?;
    Ok((prepared, report))
}
