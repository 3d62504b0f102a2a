//! `dlprobe probe <url>` – one-off probe, nothing persisted.

use anyhow::{Context, Result};
use dlprobe_core::config::ProbeConfig;
use dlprobe_core::probe::dispatch;
use dlprobe_core::transport::CurlTransport;
use dlprobe_core::{ProbeRequest, Prober};

use crate::cli::output::ConsoleListener;

#[derive(Debug)]
pub struct ProbeArgs {
    pub url: String,
    pub existing_length: Option<i64>,
    pub checksum: Option<String>,
    pub json: bool,
}

pub async fn run_probe(cfg: &ProbeConfig, args: ProbeArgs) -> Result<bool> {
    let request = ProbeRequest::new(args.url, cfg)
        .with_existing_length(args.existing_length)
        .with_checksum_hint(args.checksum);
    let prober = Prober::new(CurlTransport::new(), cfg);

    let worker_request = request.clone();
    let outcome = tokio::task::spawn_blocking(move || prober.run(&worker_request))
        .await
        .context("probe worker panicked")?;

    let ok = outcome.is_ok();
    dispatch(&request.url, &outcome, &ConsoleListener { json: args.json });
    Ok(ok)
}
