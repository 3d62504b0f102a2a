//! Probe a stored task and persist the outcome.

use anyhow::{bail, Context, Result};

use crate::config::ProbeConfig;
use crate::error::{ProbeError, ProbeErrorKind};
use crate::redirect::UrlValidator;
use crate::task_db::{TaskDb, TaskId};
use crate::transport::Transport;

use super::report::{dispatch, ProbeListener};
use super::{ProbeResult, Prober};

/// Re-probes task `id` against its stored size and checksum.
///
/// The blocking probe runs on the tokio blocking pool. On success the task
/// row is rewritten in one statement and `on_complete` fires; any failure,
/// including a failed write, fires `on_fail`. Returns `Ok(None)` after a
/// reported failure, and `Err` only when the task cannot be loaded.
pub async fn probe_stored_task<T, V>(
    db: &TaskDb,
    id: TaskId,
    cfg: &ProbeConfig,
    prober: &Prober<T, V>,
    listener: &(dyn ProbeListener + Sync),
) -> Result<Option<ProbeResult>>
where
    T: Transport + Clone + Send + 'static,
    V: UrlValidator + Clone + Send + 'static,
{
    let Some(mut task) = db.get_task(id).await? else {
        bail!("task {} not found", id);
    };
    let request = task.probe_request(cfg);

    let worker = prober.clone();
    let worker_request = request.clone();
    let outcome = tokio::task::spawn_blocking(move || worker.run(&worker_request))
        .await
        .context("probe worker panicked")?;

    let outcome = match outcome {
        Ok(result) => {
            task.apply_probe(&result);
            match db.save_probe(&task).await {
                Ok(()) => {
                    tracing::debug!(task = id, new_task = result.is_new_task, "task probe persisted");
                    Ok(result)
                }
                Err(e) => Err(ProbeError::new(
                    request.url.clone(),
                    ProbeErrorKind::Store(format!("{:#}", e)),
                )
                .with_local_path(request.local_path.clone())),
            }
        }
        Err(e) => Err(e),
    };

    dispatch(&request.url, &outcome, listener);
    Ok(outcome.ok())
}
