//! `dlprobe check <id>` – probe a stored task and persist the outcome.

use anyhow::Result;
use dlprobe_core::config::ProbeConfig;
use dlprobe_core::probe::probe_stored_task;
use dlprobe_core::task_db::TaskDb;
use dlprobe_core::transport::CurlTransport;
use dlprobe_core::Prober;

use crate::cli::output::ConsoleListener;

pub async fn run_check(db: &TaskDb, cfg: &ProbeConfig, id: i64, json: bool) -> Result<bool> {
    let prober = Prober::new(CurlTransport::new(), cfg);
    let listener = ConsoleListener { json };
    let result = probe_stored_task(db, id, cfg, &prober, &listener).await?;
    if let Some(r) = &result {
        if r.is_new_task && !json {
            println!("Task {id}: remote resource changed, saved progress must be discarded.");
        }
    }
    Ok(result.is_some())
}
