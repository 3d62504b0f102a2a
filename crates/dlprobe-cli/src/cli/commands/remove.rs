//! `dlprobe remove <id>` – delete a stored task.

use anyhow::{bail, Result};
use dlprobe_core::task_db::TaskDb;

pub async fn run_remove(db: &TaskDb, id: i64) -> Result<()> {
    if !db.remove_task(id).await? {
        bail!("no task with id {id}");
    }
    println!("Removed task {id}");
    Ok(())
}
