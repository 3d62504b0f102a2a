//! Transport error type with a coarse classification of the curl failure.

use thiserror::Error;

/// Why a request never produced a response head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connect or read timed out.
    Timeout,
    /// Network-level failure (refused, reset, DNS, etc.).
    Connection,
    /// Anything else curl reported.
    Other,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    message: String,
    #[source]
    source: Option<curl::Error>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}

/// Classify a curl error.
pub(crate) fn classify_curl_error(e: &curl::Error) -> TransportErrorKind {
    if e.is_operation_timedout() {
        return TransportErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_ssl_connect_error()
    {
        return TransportErrorKind::Connection;
    }
    TransportErrorKind::Other
}

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        Self {
            kind: classify_curl_error(&e),
            message: e.to_string(),
            source: Some(e),
        }
    }
}
