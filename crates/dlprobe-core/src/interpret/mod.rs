//! Response interpretation.
//!
//! Turns one response head into exactly one of complete, redirect or fail.
//! Pure: no I/O, no task mutation; the probe loop and the task store act on
//! the returned [`Interpretation`].

mod disposition;
mod length;

use serde::{Deserialize, Serialize};

use crate::error::ProbeErrorKind;
use crate::transport::RawResponse;

pub use disposition::{decode_disposition, encode_disposition, server_file_name};
pub use length::{content_range_total, resolve_length};

pub const HTTP_OK: u32 = 200;
pub const HTTP_PARTIAL: u32 = 206;
pub const HTTP_MOVED_PERM: u32 = 301;
pub const HTTP_MOVED_TEMP: u32 = 302;
pub const HTTP_SEE_OTHER: u32 = 303;
pub const HTTP_NOT_FOUND: u32 = 404;

/// What is already known about the task before this response.
#[derive(Debug, Clone, Copy)]
pub struct InterpretContext<'a> {
    pub existing_length: Option<i64>,
    pub existing_checksum_hint: Option<&'a str>,
    pub disposition_file_key: &'a str,
}

/// Facts derived from a final (non-redirect) 200/206 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFacts {
    pub status_code: u32,
    /// `-1` when undeterminable (only possible for chunk-encoded bodies).
    pub content_length: i64,
    pub supports_range_resume: bool,
    pub is_chunk_encoded: bool,
    pub server_file_name: Option<String>,
    /// `Content-MD5`, only when the task had no hint yet.
    pub checksum_hint: Option<String>,
    pub is_new_task: bool,
    /// Base64 of the raw `Content-Disposition` header.
    pub disposition_raw: Option<String>,
}

/// A 301/302/303 hop, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectHop {
    pub status_code: u32,
    pub location: Option<String>,
    /// `Cookie` header value to forward on the next hop.
    pub cookie: Option<String>,
}

#[derive(Debug)]
pub enum Interpretation {
    Complete(ResponseFacts),
    Redirect(RedirectHop),
    Fail(ProbeErrorKind),
}

pub fn is_chunked(response: &RawResponse) -> bool {
    response.header("Transfer-Encoding") == Some("chunked")
}

/// Checksum hint to adopt: `Content-MD5`, unless the task already has one.
pub fn checksum_hint(response: &RawResponse, existing: Option<&str>) -> Option<String> {
    if existing.is_some_and(|s| !s.is_empty()) {
        return None;
    }
    response
        .header("Content-MD5")
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Cookie pairs from every `Set-Cookie` header, attributes stripped, joined with `"; "`.
pub fn forwarded_cookie(response: &RawResponse) -> Option<String> {
    let pairs: Vec<&str> = response
        .headers
        .get_all("Set-Cookie")
        .filter_map(|v| v.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}

pub fn interpret(response: &RawResponse, ctx: &InterpretContext<'_>) -> Interpretation {
    let code = response.status;
    match code {
        HTTP_PARTIAL | HTTP_OK => complete(response, ctx),
        HTTP_NOT_FOUND => Interpretation::Fail(ProbeErrorKind::NotFound),
        HTTP_MOVED_PERM | HTTP_MOVED_TEMP | HTTP_SEE_OTHER => {
            Interpretation::Redirect(RedirectHop {
                status_code: code,
                location: response.header("Location").map(str::to_string),
                cookie: forwarded_cookie(response),
            })
        }
        other => Interpretation::Fail(ProbeErrorKind::UnexpectedStatus(other)),
    }
}

fn complete(response: &RawResponse, ctx: &InterpretContext<'_>) -> Interpretation {
    let code = response.status;
    let len = resolve_length(response);
    let chunked = is_chunked(response);

    if len < 0 && !chunked {
        return Interpretation::Fail(ProbeErrorKind::UnresolvedLength { status: code });
    }

    let disposition = response.header("Content-Disposition").filter(|d| !d.is_empty());

    Interpretation::Complete(ResponseFacts {
        status_code: code,
        content_length: len,
        // A segment plan needs the total, so an unknown length never advertises resume.
        supports_range_resume: code == HTTP_PARTIAL && len >= 0,
        is_chunk_encoded: chunked,
        server_file_name: disposition
            .and_then(|d| server_file_name(d, ctx.disposition_file_key)),
        checksum_hint: checksum_hint(response, ctx.existing_checksum_hint),
        is_new_task: ctx.existing_length != Some(len),
        disposition_raw: disposition.map(encode_disposition),
    })
}

#[cfg(test)]
mod tests;
