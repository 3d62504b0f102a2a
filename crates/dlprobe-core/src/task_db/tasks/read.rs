//! Task read operations: list and get.

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::path::PathBuf;

use super::super::db::TaskDb;
use super::super::types::{TaskId, TaskRecord, TaskSummary};

fn status_code(raw: Option<i64>) -> Option<u32> {
    raw.and_then(|c| u32::try_from(c).ok())
}

fn record_from_row(row: &SqliteRow) -> TaskRecord {
    let local_path: Option<String> = row.get("local_path");
    TaskRecord {
        id: row.get("id"),
        url: row.get("url"),
        local_path: local_path.map(PathBuf::from),
        code: status_code(row.get("code")),
        is_support_bp: row.get("is_support_bp"),
        is_chunked: row.get("is_chunked"),
        is_new_task: row.get("is_new_task"),
        file_size: row.get("file_size"),
        md5_code: row.get("md5_code"),
        disposition: row.get("disposition"),
        server_file_name: row.get("server_file_name"),
        redirect_url: row.get("redirect_url"),
        is_redirect: row.get("is_redirect"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl TaskDb {
    /// List all tasks, newest first.
    pub async fn list_tasks(&self) -> Result<Vec<TaskSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, url, code, file_size, is_support_bp, server_file_name
            FROM tasks
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(TaskSummary {
                id: row.get("id"),
                url: row.get("url"),
                code: status_code(row.get("code")),
                file_size: row.get("file_size"),
                is_support_bp: row.get("is_support_bp"),
                server_file_name: row.get("server_file_name"),
            });
        }

        Ok(out)
    }

    /// Fetch a single task with all probe fields.
    pub async fn get_task(&self, id: TaskId) -> Result<Option<TaskRecord>> {
        let row = sqlx::query(
            r#"
            SELECT
                id, url, local_path, code, is_support_bp, is_chunked, is_new_task,
                file_size, md5_code, disposition, server_file_name, redirect_url,
                is_redirect, created_at, updated_at
            FROM tasks
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(record_from_row))
    }
}
