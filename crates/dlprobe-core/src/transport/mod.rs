//! HTTP transport for the probe.
//!
//! The probe never reads a body: a [`Transport`] sends one request, collects
//! the status line and headers, and releases the connection before
//! returning. [`CurlTransport`] is the libcurl-backed implementation; tests
//! substitute scripted transports.

mod easy;
mod error;
mod headers;

use std::time::Duration;

pub use easy::CurlTransport;
pub use error::{TransportError, TransportErrorKind};
pub use headers::ResponseHeaders;

/// One outgoing request (always a GET).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub connect_timeout: Duration,
    pub read_timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub proxy: Option<String>,
    pub insecure: bool,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            connect_timeout: Duration::from_secs(15),
            read_timeout: None,
            user_agent: None,
            proxy: None,
            insecure: false,
        }
    }

    /// Sets a header, replacing any existing value with the same (case-insensitive) name.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Connection parameters applied to every request of a probe (timeouts, proxy, TLS, user headers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub connect_timeout: Duration,
    /// Abort when the connection stalls for this long. `None` waits indefinitely.
    pub read_timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub proxy: Option<String>,
    pub insecure: bool,
    pub headers: Vec<(String, String)>,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            read_timeout: Some(Duration::from_secs(30)),
            user_agent: None,
            proxy: None,
            insecure: false,
            headers: Vec::new(),
        }
    }
}

impl ConnectionParams {
    pub fn apply(&self, mut request: HttpRequest) -> HttpRequest {
        request.connect_timeout = self.connect_timeout;
        request.read_timeout = self.read_timeout;
        request.user_agent = self.user_agent.clone();
        request.proxy = self.proxy.clone();
        request.insecure = self.insecure;
        for (k, v) in &self.headers {
            request = request.header(k, v.clone());
        }
        request
    }
}

/// Status line and headers of a response whose body was not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u32,
    /// Content length as reported by the transport itself; `-1` when unknown.
    pub reported_length: i64,
    pub headers: ResponseHeaders,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}

/// Sends a request and returns its response head. The connection must be released
/// before `send` returns, whatever the outcome.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        (**self).send(request)
    }
}
