use fetchcheck_core::logging;
use std::process::ExitCode;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging as early as possible; an unwritable state dir falls back to stderr.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("log file unavailable, logging to stderr: {:#}", err);
    }

    // Parse CLI and dispatch.
    match CliCommand::run_from_args().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("fetchcheck error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
