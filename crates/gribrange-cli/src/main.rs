use gribrange_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr if the
    // state directory is unusable.
    if let Err(err) = logging::init_logging() {
        match logging::init_logging_stderr() {
            Ok(()) => tracing::warn!("file logging unavailable, using stderr: {:#}", err),
            Err(stderr_err) => eprintln!("gribrange: logging disabled: {:#}; {:#}", err, stderr_err),
        }
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("gribrange error: {:#}", err);
        std::process::exit(1);
    }
}
