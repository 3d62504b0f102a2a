use dlprobe_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    match CliCommand::run_from_args().await {
        Ok(true) => {}
        // The failure was already reported by the probe listener.
        Ok(false) => std::process::exit(2),
        Err(err) => {
            eprintln!("dlprobe error: {:#}", err);
            std::process::exit(1);
        }
    }
}
