//! Total-length resolution from a ranged response.

use crate::transport::RawResponse;

/// Resolves the total content length, `-1` when nothing usable is present.
///
/// Tried in order: the length the transport reported, `Content-Length`, then
/// the total of `Content-Range` (`bytes <start>-<end>/<total>`). Values that do
/// not parse count as absent.
pub fn resolve_length(response: &RawResponse) -> i64 {
    if response.reported_length >= 0 {
        return response.reported_length;
    }
    if let Some(len) = response
        .header("Content-Length")
        .and_then(parse_non_negative)
    {
        return len;
    }
    // Some servers answer `Range: bytes=0-` with only `Content-Range: bytes 0-N/TOTAL`.
    response
        .header("Content-Range")
        .and_then(content_range_total)
        .unwrap_or(-1)
}

/// Total from a `Content-Range` value: everything after the last `/`.
pub fn content_range_total(value: &str) -> Option<i64> {
    let (_, total) = value.rsplit_once('/')?;
    parse_non_negative(total)
}

fn parse_non_negative(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<i64>().ok().filter(|n| *n >= 0)
}
