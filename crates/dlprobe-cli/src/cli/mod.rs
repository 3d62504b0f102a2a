//! CLI for the dlprobe download negotiation probe.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dlprobe_core::config;
use dlprobe_core::task_db::TaskDb;
use std::path::PathBuf;

use commands::{run_add, run_check, run_probe, run_remove, run_status, ProbeArgs};

/// Top-level CLI for dlprobe.
#[derive(Debug, Parser)]
#[command(name = "dlprobe")]
#[command(about = "dlprobe: find out how an HTTP resource should be downloaded", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Probe a URL once and print the result.
    Probe {
        /// HTTP/HTTPS URL to probe.
        url: String,
        /// Previously recorded size; a different size marks the resource as changed.
        #[arg(long, value_name = "BYTES")]
        existing_length: Option<i64>,
        /// Checksum already known for this resource (suppresses Content-MD5 adoption).
        #[arg(long, value_name = "HINT")]
        checksum: Option<String>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Record a task to probe later.
    Add {
        /// HTTP/HTTPS URL of the resource.
        url: String,
        /// Where the file will be saved (used in failure reports).
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// Probe a stored task and persist the outcome.
    Check {
        /// Task identifier.
        id: i64,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show all stored tasks.
    Status,

    /// Remove a stored task by ID.
    Remove {
        /// Task identifier.
        id: i64,
    },
}

impl CliCommand {
    /// Returns `Ok(false)` when a probe ran and failed.
    pub async fn run_from_args() -> Result<bool> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Probe {
                url,
                existing_length,
                checksum,
                json,
            } => {
                let args = ProbeArgs {
                    url,
                    existing_length,
                    checksum,
                    json,
                };
                run_probe(&cfg, args).await
            }
            CliCommand::Add { url, path } => {
                let db = TaskDb::open_default().await?;
                run_add(&db, &url, path.as_deref()).await?;
                Ok(true)
            }
            CliCommand::Check { id, json } => {
                let db = TaskDb::open_default().await?;
                run_check(&db, &cfg, id, json).await
            }
            CliCommand::Status => {
                let db = TaskDb::open_default().await?;
                run_status(&db).await?;
                Ok(true)
            }
            CliCommand::Remove { id } => {
                let db = TaskDb::open_default().await?;
                run_remove(&db, id).await?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests;
