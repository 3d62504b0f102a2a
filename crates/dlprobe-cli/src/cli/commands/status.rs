//! `dlprobe status` – show all stored tasks.

use anyhow::Result;
use dlprobe_core::task_db::TaskDb;

use crate::cli::output::length_str;

pub async fn run_status(db: &TaskDb) -> Result<()> {
    let tasks = db.list_tasks().await?;
    if tasks.is_empty() {
        println!("No tasks in database.");
        return Ok(());
    }

    println!("{:<6} {:<6} {:<8} {:<16} {}", "ID", "CODE", "RESUME", "SIZE", "URL");
    for t in tasks {
        let code = t
            .code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let size = t.file_size.map(length_str).unwrap_or_else(|| "-".to_string());
        let resume = if t.code.is_none() {
            "-"
        } else if t.is_support_bp {
            "yes"
        } else {
            "no"
        };
        println!("{:<6} {:<6} {:<8} {:<16} {}", t.id, code, resume, size, t.url);
        if let Some(name) = t.server_file_name {
            println!("{:<6} server name: {}", "", name);
        }
    }
    Ok(())
}
