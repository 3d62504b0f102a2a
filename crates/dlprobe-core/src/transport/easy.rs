//! libcurl-backed transport.
//!
//! Sends a GET without following redirects and aborts the transfer on the
//! first body byte, so only the response head is consumed. The easy handle
//! is owned by `send` and dropped on every return path.

use std::str;

use super::error::{TransportError, TransportErrorKind};
use super::headers::ResponseHeaders;
use super::{HttpRequest, RawResponse, Transport};

#[derive(Debug, Clone, Copy, Default)]
pub struct CurlTransport;

impl CurlTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for CurlTransport {
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let mut lines: Vec<String> = Vec::new();
        let mut body_started = false;

        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url)?;
        easy.get(true)?;
        easy.follow_location(false)?;
        easy.connect_timeout(request.connect_timeout)?;
        if let Some(read_timeout) = request.read_timeout {
            easy.low_speed_limit(1)?;
            easy.low_speed_time(read_timeout)?;
        }
        if let Some(ua) = &request.user_agent {
            easy.useragent(ua)?;
        }
        if let Some(proxy) = &request.proxy {
            easy.proxy(proxy)?;
        }
        if request.insecure {
            easy.ssl_verify_peer(false)?;
            easy.ssl_verify_host(false)?;
        }

        let mut list = curl::easy::List::new();
        for (k, v) in &request.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        easy.http_headers(list)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    lines.push(s.trim_end().to_string());
                }
                true
            })?;
            // Returning 0 makes curl abort with a write error: headers are all we need.
            transfer.write_function(|_data| {
                body_started = true;
                Ok(0)
            })?;
            transfer.perform()
        };

        match performed {
            Ok(()) => {}
            Err(e) if e.is_write_error() && body_started => {}
            Err(e) => return Err(e.into()),
        }

        let (parsed_status, headers) = ResponseHeaders::from_lines(&lines);
        let status = match parsed_status {
            Some(code) => code,
            None => easy.response_code()?,
        };
        if status == 0 {
            return Err(TransportError::new(
                TransportErrorKind::Other,
                format!("no response status from {}", request.url),
            ));
        }

        let reported_length = easy
            .content_length_download()
            .ok()
            .filter(|len| *len >= 0.0)
            .map(|len| len as i64)
            .unwrap_or(-1);

        tracing::trace!(
            url = %request.url,
            status,
            header_count = lines.len(),
            "response head received"
        );

        Ok(RawResponse {
            status,
            reported_length,
            headers,
        })
    }
}
