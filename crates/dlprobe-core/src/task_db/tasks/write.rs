//! Task write operations: add, save probe outcome, remove.

use anyhow::{bail, Result};
use std::path::Path;

use super::super::db::{unix_timestamp, TaskDb};
use super::super::types::{TaskId, TaskRecord};

impl TaskDb {
    /// Insert a new task with only its URL (and optional destination) known.
    ///
    /// Probe fields are filled in later by `save_probe`.
    pub async fn add_task(&self, url: &str, local_path: Option<&Path>) -> Result<TaskId> {
        let now = unix_timestamp();
        let local_path = local_path.map(|p| p.to_string_lossy().into_owned());

        let row_id = sqlx::query(
            r#"
            INSERT INTO tasks (url, local_path, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(url)
        .bind(local_path)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(row_id)
    }

    /// Persist every probe-derived field of `task` in one statement.
    pub async fn save_probe(&self, task: &TaskRecord) -> Result<()> {
        let now = unix_timestamp();
        let r = sqlx::query(
            r#"
            UPDATE tasks
            SET code = ?1,
                is_support_bp = ?2,
                is_chunked = ?3,
                is_new_task = ?4,
                file_size = ?5,
                md5_code = ?6,
                disposition = ?7,
                server_file_name = ?8,
                redirect_url = ?9,
                is_redirect = ?10,
                updated_at = ?11
            WHERE id = ?12
            "#,
        )
        .bind(task.code.map(i64::from))
        .bind(task.is_support_bp)
        .bind(task.is_chunked)
        .bind(task.is_new_task)
        .bind(task.file_size)
        .bind(&task.md5_code)
        .bind(&task.disposition)
        .bind(&task.server_file_name)
        .bind(&task.redirect_url)
        .bind(task.is_redirect)
        .bind(now)
        .bind(task.id)
        .execute(&self.pool)
        .await?;

        if r.rows_affected() == 0 {
            bail!("task {} not found", task.id);
        }
        Ok(())
    }

    /// Permanently remove a task row. Returns false if no such task existed.
    pub async fn remove_task(&self, id: TaskId) -> Result<bool> {
        let r = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(r.rows_affected() > 0)
    }
}
