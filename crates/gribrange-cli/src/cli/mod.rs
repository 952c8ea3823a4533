//! CLI for gribrange.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gribrange_core::config;
use std::path::PathBuf;

use commands::{run_fetch, run_list, FetchArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gribrange")]
#[command(about = "Download selected GRIB2 records using the .idx inventory and HTTP Range requests", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch the records selected by a job file (JSON or TOML).
    Fetch {
        /// Job file with `idx_url` and `parameters`.
        job: PathBuf,
        /// Output file (overrides the job file and the derived name).
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Directory for the output when no absolute path is given (default: current dir).
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Print the planned ranges and stop.
        #[arg(long)]
        dry_run: bool,
        /// Also save the downloaded index as `<output>.idx`.
        #[arg(long)]
        keep_index: bool,
    },

    /// List the records of an index (URL or local file).
    List {
        /// Index URL or path.
        index: String,
        /// Only show these parameters (repeatable).
        #[arg(long = "parameter", short = 'p', value_name = "NAME")]
        parameters: Vec<String>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let settings = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", settings);

        match cli.command {
            CliCommand::Fetch {
                job,
                output,
                output_dir,
                dry_run,
                keep_index,
            } => {
                let output_dir = match output_dir {
                    Some(d) => d,
                    None => std::env::current_dir()?,
                };
                let args = FetchArgs {
                    job,
                    output,
                    output_dir,
                    dry_run,
                    keep_index,
                };
                run_fetch(&settings, &args).await?;
            }
            CliCommand::List { index, parameters } => {
                run_list(&settings, &index, &parameters).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
