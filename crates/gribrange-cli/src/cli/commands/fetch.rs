//! `gribrange fetch <job>` – plan and download the selected records.

use anyhow::Result;
use gribrange_core::config::{JobSpec, Settings};
use gribrange_core::job;
use gribrange_core::selector::TransferPlan;
use gribrange_core::transfer::{RangeDone, TransferError};
use std::path::PathBuf;

use super::mb;

/// Resolved arguments of the `fetch` subcommand.
#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub job: PathBuf,
    pub output: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub keep_index: bool,
}

pub async fn run_fetch(settings: &Settings, args: &FetchArgs) -> Result<()> {
    let mut spec = JobSpec::load(&args.job)?;
    if let Some(out) = &args.output {
        spec.output = Some(out.clone());
    }
    let destination = job::resolve_output(&spec, &args.output_dir)?;

    println!("Downloading index: {}", spec.idx_url);
    let prepared = job::prepare(&spec, settings, &destination, args.keep_index).await?;
    if let Some(path) = &prepared.saved_index {
        println!("Saved index to {}", path.display());
    }
    let plan = prepared.plan;
    print_plan(&plan);

    if plan.is_empty() {
        println!("No records matched the requested parameters; nothing to download.");
        return Ok(());
    }
    if args.dry_run {
        return Ok(());
    }

    println!("Downloading GRIB data to: {}", destination.display());
    let total = plan.ranges().len();
    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<RangeDone>(total);
    let progress_handle = tokio::spawn(async move {
        let mut done = 0usize;
        while let Some(ev) = progress_rx.recv().await {
            done += 1;
            match ev.bytes {
                Some(n) => println!("  [{}/{}] range {} done ({})", done, total, ev.range, mb(n)),
                None => println!("  [{}/{}] range {} failed", done, total, ev.range),
            }
        }
    });

    let result = job::execute(plan, settings, Some(progress_tx)).await;
    let _ = progress_handle.await;

    match result {
        Ok(report) => {
            println!(
                "Download completed successfully ({} in {} range(s))",
                mb(report.bytes_written),
                report.ranges
            );
            Ok(())
        }
        Err(err) => {
            if let Some(transfer_err) = err.downcast_ref::<TransferError>() {
                for failure in transfer_err.failures() {
                    eprintln!("  {}", failure);
                }
                if !transfer_err.failures().is_empty() {
                    eprintln!("Partial file left at {}", destination.display());
                }
            }
            Err(err)
        }
    }
}

fn print_plan(plan: &TransferPlan) {
    println!("Download ranges:");
    for (i, r) in plan.ranges().iter().enumerate() {
        println!("Range {}: {}-{} ({})", i + 1, r.start, r.end, mb(r.len()));
    }
    println!("Total download size: {}", mb(plan.total_size()));
}
