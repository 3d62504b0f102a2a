//! Pre-download negotiation probe.
//!
//! Sends `GET` with `Range: bytes=0-` and follows 301/302/303 hops until a
//! response can be interpreted as complete or failed. A 206 means the server
//! honors ranges and the body can be fetched in resumable segments; a 200
//! means it ignored the range and the body must be streamed once.
//!
//! Runs in the current thread; call from `spawn_blocking` if used from async code.

mod report;
mod task;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ProbeConfig;
use crate::error::{ProbeError, ProbeErrorKind};
use crate::interpret::{self, InterpretContext, Interpretation, ResponseFacts};
use crate::redirect::{self, SyntaxValidator, UrlValidator};
use crate::transport::{ConnectionParams, HttpRequest, RawResponse, Transport};

pub use report::{dispatch, ProbeListener};
pub use task::probe_stored_task;

/// Input of one probe. Immutable for the probe's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub url: String,
    /// Size recorded by an earlier probe of the same task.
    pub existing_length: Option<i64>,
    pub existing_checksum_hint: Option<String>,
    pub connect_timeout: Duration,
    /// Marker locating the filename inside `Content-Disposition`.
    pub disposition_file_key: String,
    /// Where the caller intends to store the file; only used for log context.
    pub local_path: Option<PathBuf>,
}

impl ProbeRequest {
    pub fn new(url: impl Into<String>, cfg: &ProbeConfig) -> Self {
        Self {
            url: url.into(),
            existing_length: None,
            existing_checksum_hint: None,
            connect_timeout: cfg.connect_timeout(),
            disposition_file_key: cfg.disposition_file_key.clone(),
            local_path: None,
        }
    }

    pub fn with_existing_length(mut self, len: Option<i64>) -> Self {
        self.existing_length = len;
        self
    }

    pub fn with_checksum_hint(mut self, hint: Option<String>) -> Self {
        self.existing_checksum_hint = hint.filter(|h| !h.is_empty());
        self
    }

    pub fn with_local_path(mut self, path: Option<PathBuf>) -> Self {
        self.local_path = path;
        self
    }

    fn context(&self) -> InterpretContext<'_> {
        InterpretContext {
            existing_length: self.existing_length,
            existing_checksum_hint: self.existing_checksum_hint.as_deref(),
            disposition_file_key: &self.disposition_file_key,
        }
    }

    fn error(&self, kind: ProbeErrorKind) -> ProbeError {
        ProbeError::new(self.url.clone(), kind).with_local_path(self.local_path.clone())
    }
}

/// Outcome of a successful probe: how the resource should be downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status_code: u32,
    /// `-1` if undeterminable (chunk-encoded bodies only).
    pub content_length: i64,
    pub supports_range_resume: bool,
    pub is_chunk_encoded: bool,
    pub is_redirect: bool,
    /// Last redirect target followed.
    pub redirect_url: Option<String>,
    pub server_file_name: Option<String>,
    /// Only set when the request carried no checksum hint.
    pub checksum_hint: Option<String>,
    /// Resource changed since last probe; prior progress must be discarded.
    pub is_new_task: bool,
    /// Base64 of the raw `Content-Disposition` header.
    pub disposition_raw: Option<String>,
}

impl ProbeResult {
    fn from_facts(facts: ResponseFacts, redirect_url: Option<String>) -> Self {
        Self {
            status_code: facts.status_code,
            content_length: facts.content_length,
            supports_range_resume: facts.supports_range_resume,
            is_chunk_encoded: facts.is_chunk_encoded,
            is_redirect: redirect_url.is_some(),
            redirect_url,
            server_file_name: facts.server_file_name,
            checksum_hint: facts.checksum_hint,
            is_new_task: facts.is_new_task,
            disposition_raw: facts.disposition_raw,
        }
    }

    /// True when the downloader can split the body into ranged segments.
    pub fn segmentable(&self) -> bool {
        self.supports_range_resume && !self.is_chunk_encoded && self.content_length > 0
    }
}

/// Runs probes with a fixed transport, configuration and URL validator.
#[derive(Debug, Clone)]
pub struct Prober<T, V = SyntaxValidator> {
    transport: T,
    validator: V,
    params: ConnectionParams,
    max_redirects: u32,
}

impl<T: Transport> Prober<T> {
    pub fn new(transport: T, cfg: &ProbeConfig) -> Self {
        Self {
            transport,
            validator: SyntaxValidator,
            params: cfg.connection_params(),
            max_redirects: cfg.max_redirects,
        }
    }
}

impl<T: Transport, V: UrlValidator> Prober<T, V> {
    pub fn with_validator<W: UrlValidator>(self, validator: W) -> Prober<T, W> {
        Prober {
            transport: self.transport,
            validator,
            params: self.params,
            max_redirects: self.max_redirects,
        }
    }

    /// Probes `request.url` and reports the outcome to `listener` exactly once.
    pub fn probe(&self, request: &ProbeRequest, listener: &dyn ProbeListener) -> Option<ProbeResult> {
        let outcome = self.run(request);
        dispatch(&request.url, &outcome, listener);
        outcome.ok()
    }

    /// Probes `request.url`, following redirects up to the configured limit.
    pub fn run(&self, request: &ProbeRequest) -> Result<ProbeResult, ProbeError> {
        let mut current = url::Url::parse(request.url.trim())
            .map_err(|e| request.error(ProbeErrorKind::InvalidUrl(format!("{}: {}", request.url, e))))?
            .to_string();
        let mut cookie: Option<String> = None;
        let mut redirect_url: Option<String> = None;
        let mut hops = 0u32;

        loop {
            let response = self
                .fetch(request, &current, cookie.as_deref())
                .map_err(|kind| request.error(kind))?;

            match interpret::interpret(&response, &request.context()) {
                Interpretation::Complete(facts) => {
                    tracing::debug!(
                        url = %request.url,
                        status = facts.status_code,
                        content_length = facts.content_length,
                        resume = facts.supports_range_resume,
                        chunked = facts.is_chunk_encoded,
                        new_task = facts.is_new_task,
                        "probe complete"
                    );
                    return Ok(ProbeResult::from_facts(facts, redirect_url));
                }
                Interpretation::Fail(kind) => return Err(request.error(kind)),
                Interpretation::Redirect(hop) => {
                    tracing::debug!(
                        from = %current,
                        status = hop.status_code,
                        location = hop.location.as_deref().unwrap_or(""),
                        "30x redirect"
                    );
                    let next = redirect::validate_location(hop.location.as_deref(), &self.validator)
                        .map_err(|kind| request.error(kind))?;
                    hops += 1;
                    if hops > self.max_redirects {
                        return Err(request.error(ProbeErrorKind::TooManyRedirects {
                            limit: self.max_redirects,
                        }));
                    }
                    cookie = hop.cookie;
                    redirect_url = Some(next.clone());
                    current = next;
                }
            }
        }
    }

    /// One hop: the connection lives only inside `Transport::send`.
    fn fetch(
        &self,
        request: &ProbeRequest,
        url: &str,
        cookie: Option<&str>,
    ) -> Result<RawResponse, ProbeErrorKind> {
        let mut req = self.params.apply(HttpRequest::get(url));
        req.connect_timeout = request.connect_timeout;
        if let Some(cookie) = cookie {
            req = req.header("Cookie", cookie);
        }
        req = req.header("Range", "bytes=0-");
        self.transport.send(&req).map_err(|e| {
            if e.is_timeout() {
                tracing::warn!(
                    url = %req.url,
                    connect_timeout = ?req.connect_timeout,
                    read_timeout = ?req.read_timeout,
                    "request timed out"
                );
            }
            ProbeErrorKind::from(e)
        })
    }
}
