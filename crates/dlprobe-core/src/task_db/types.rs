//! Types used by the task database.

use std::path::PathBuf;

use crate::config::ProbeConfig;
use crate::probe::{ProbeRequest, ProbeResult};

/// Task identifier.
pub type TaskId = i64;

/// Summary view used by the CLI `status` command.
#[derive(Debug, Clone)]
pub struct TaskSummary {
    pub id: TaskId,
    pub url: String,
    pub code: Option<u32>,
    pub file_size: Option<i64>,
    pub is_support_bp: bool,
    pub server_file_name: Option<String>,
}

/// Full task record as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: TaskId,
    pub url: String,
    pub local_path: Option<PathBuf>,
    /// Status code of the last completed probe.
    pub code: Option<u32>,
    /// Server honors `Range` (206).
    pub is_support_bp: bool,
    pub is_chunked: bool,
    pub is_new_task: bool,
    pub file_size: Option<i64>,
    pub md5_code: Option<String>,
    /// Base64 of the raw `Content-Disposition` header.
    pub disposition: Option<String>,
    pub server_file_name: Option<String>,
    pub redirect_url: Option<String>,
    pub is_redirect: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TaskRecord {
    /// Request for re-probing this task: the stored size and checksum become the baseline.
    pub fn probe_request(&self, cfg: &ProbeConfig) -> ProbeRequest {
        ProbeRequest::new(self.url.clone(), cfg)
            .with_existing_length(self.file_size)
            .with_checksum_hint(self.md5_code.clone())
            .with_local_path(self.local_path.clone())
    }

    /// Applies a completed probe to the record. Does not persist.
    pub fn apply_probe(&mut self, result: &ProbeResult) {
        self.code = Some(result.status_code);
        self.is_support_bp = result.supports_range_resume;
        self.is_chunked = result.is_chunk_encoded;
        self.is_new_task = result.is_new_task;
        self.file_size = Some(result.content_length);
        if let Some(md5) = &result.checksum_hint {
            self.md5_code = Some(md5.clone());
        }
        if let Some(disposition) = &result.disposition_raw {
            self.disposition = Some(disposition.clone());
        }
        if let Some(name) = &result.server_file_name {
            self.server_file_name = Some(name.clone());
        }
        self.is_redirect = result.is_redirect;
        self.redirect_url = result.redirect_url.clone();
    }
}
