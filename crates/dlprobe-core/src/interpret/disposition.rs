//! Content-Disposition handling: persisted form and server filename.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Opaque form of the raw header stored with the task.
pub fn encode_disposition(raw: &str) -> String {
    STANDARD.encode(raw.as_bytes())
}

/// Inverse of [`encode_disposition`]; `None` if the stored value is not valid base64/UTF-8.
pub fn decode_disposition(stored: &str) -> Option<String> {
    let bytes = STANDARD.decode(stored.trim()).ok()?;
    String::from_utf8(bytes).ok()
}

/// Extracts the server filename when `header` contains `key`.
///
/// The value is the second `=`-separated component, cut at the next `;`,
/// with quotes and any RFC 5987 `charset''` prefix removed, then
/// percent-decoded as UTF-8. Headers without the key, or with the key but
/// no `=`, yield `None`.
pub fn server_file_name(header: &str, key: &str) -> Option<String> {
    if key.is_empty() || !header.contains(key) {
        return None;
    }
    let value = header.split('=').nth(1)?;
    let value = value.split(';').next().unwrap_or(value).trim();
    let value = unquote(value);
    let value = match value.split_once("''") {
        Some((_charset, encoded)) => encoded,
        None => value,
    };

    let decoded = match urlencoding::decode(value) {
        Ok(d) => d.into_owned(),
        Err(_) => {
            tracing::warn!("Content-Disposition filename is not UTF-8 after decoding: {}", value);
            String::from_utf8_lossy(&urlencoding::decode_binary(value.as_bytes())).into_owned()
        }
    };
    let decoded = decoded.trim();
    if decoded.is_empty() {
        None
    } else {
        Some(decoded.to_string())
    }
}

fn unquote(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}
