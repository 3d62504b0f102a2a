//! Probe failure taxonomy.
//!
//! Every failure is terminal for the probe. Whether the caller may re-attempt
//! the whole probe is a property of the kind, see [`ProbeErrorKind::needs_retry`].

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum ProbeErrorKind {
    /// Connect or send failed before a response head arrived.
    #[error("network error: {0}")]
    Network(#[from] TransportError),
    /// Server answered 404.
    #[error("HTTP 404: resource not found")]
    NotFound,
    /// Any status the probe has no handling for.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u32),
    /// 200/206 without a usable length on a response that is not chunk-encoded.
    #[error("content length unresolved (HTTP {status}, not chunk-encoded)")]
    UnresolvedLength { status: u32 },
    /// Redirect without a usable absolute `Location`.
    #[error("failed to obtain redirect link")]
    RedirectMissing,
    /// Redirect target failed URL validation.
    #[error("redirect URL error: {0}")]
    RedirectInvalid(String),
    #[error("too many redirects (limit {limit})")]
    TooManyRedirects { limit: u32 },
    /// The requested URL itself could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// The probe succeeded but the outcome could not be persisted.
    #[error("failed to persist probe result: {0}")]
    Store(String),
}

impl ProbeErrorKind {
    /// Default retry policy for this kind of failure.
    pub fn needs_retry(&self) -> bool {
        match self {
            ProbeErrorKind::Network(_)
            | ProbeErrorKind::UnexpectedStatus(_)
            | ProbeErrorKind::UnresolvedLength { .. }
            | ProbeErrorKind::Store(_) => true,
            ProbeErrorKind::NotFound
            | ProbeErrorKind::RedirectMissing
            | ProbeErrorKind::RedirectInvalid(_)
            | ProbeErrorKind::TooManyRedirects { .. }
            | ProbeErrorKind::InvalidUrl(_) => false,
        }
    }
}

/// A terminal probe failure with the context it happened in.
#[derive(Debug)]
pub struct ProbeError {
    /// URL the probe was started for (not the redirect hop).
    pub url: String,
    pub local_path: Option<PathBuf>,
    pub kind: ProbeErrorKind,
}

impl ProbeError {
    pub fn new(url: impl Into<String>, kind: ProbeErrorKind) -> Self {
        Self {
            url: url.into(),
            local_path: None,
            kind,
        }
    }

    pub fn with_local_path(mut self, path: Option<PathBuf>) -> Self {
        self.local_path = path;
        self
    }

    pub fn needs_retry(&self) -> bool {
        self.kind.needs_retry()
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "probe failed [url: {}]", self.url)?;
        if let Some(path) = &self.local_path {
            write!(f, " [path: {}]", path.display())?;
        }
        write!(f, ": {}", self.kind)
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
