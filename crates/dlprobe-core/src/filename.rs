//! Local filename suggestion for a probed resource.
//!
//! The server name from `Content-Disposition` wins; otherwise the last URL
//! path segment is used. Either is sanitized for Linux filesystems.

/// Used when neither the server nor the URL yields a usable name.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Linux NAME_MAX, in bytes.
const NAME_MAX: usize = 255;

/// Suggests a filename for saving the resource at `url`.
///
/// # Examples
///
/// - `derive_filename("https://example.com/archive.zip", None)` → `"archive.zip"`
/// - `derive_filename("https://example.com/get?id=1", Some("report.pdf"))` → `"report.pdf"`
pub fn derive_filename(url: &str, server_file_name: Option<&str>) -> String {
    server_file_name
        .map(sanitize_filename)
        .filter(|s| is_usable(s))
        .or_else(|| {
            last_path_segment(url)
                .map(|s| sanitize_filename(&s))
                .filter(|s| is_usable(s))
        })
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// Percent-decoded last non-empty path segment of `url`.
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let decoded = urlencoding::decode(segment)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    Some(decoded)
}

/// Replaces path separators, NUL and control characters with `_`, trims
/// surrounding whitespace and dots, and caps the length at 255 bytes.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut replaced_last = false;
    for c in name.chars() {
        if c == '/' || c == '\\' || c == '\0' || c.is_control() {
            if !replaced_last {
                out.push('_');
            }
            replaced_last = true;
        } else {
            out.push(c);
            replaced_last = false;
        }
    }

    let trimmed = out.trim_matches(|c: char| c.is_whitespace() || c == '.' || c == '_');
    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}

fn is_usable(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".."
}
