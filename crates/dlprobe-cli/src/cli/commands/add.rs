//! `dlprobe add <url>` – record a task to probe later.

use anyhow::Result;
use dlprobe_core::task_db::TaskDb;
use std::path::Path;

pub async fn run_add(db: &TaskDb, url: &str, path: Option<&Path>) -> Result<()> {
    let id = db.add_task(url, path).await?;
    println!("Added task {id} for URL: {url}");
    Ok(())
}
