//! Redirect target validation.

use crate::error::ProbeErrorKind;

/// URL-validity check consulted before following a redirect.
pub trait UrlValidator {
    fn is_valid_url(&self, url: &str) -> bool;
}

/// Accepts absolute http/https URLs with a host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxValidator;

impl UrlValidator for SyntaxValidator {
    fn is_valid_url(&self, url: &str) -> bool {
        match url::Url::parse(url) {
            Ok(parsed) => {
                matches!(parsed.scheme(), "http" | "https")
                    && parsed.host_str().is_some_and(|h| !h.is_empty())
            }
            Err(_) => false,
        }
    }
}

impl<F> UrlValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid_url(&self, url: &str) -> bool {
        self(url)
    }
}

/// Checks a `Location` value and returns the URL to follow.
///
/// Empty, `"null"` (any case), or non-`http` targets mean the redirect link
/// was stripped or mangled; targets rejected by `validator` are malformed.
/// Both are fatal for the probe.
///
/// The returned URL is normalized the same way as the initial one, so a
/// target with spaces or raw non-ASCII is percent-encoded before it is sent.
pub fn validate_location<V>(location: Option<&str>, validator: &V) -> Result<String, ProbeErrorKind>
where
    V: UrlValidator + ?Sized,
{
    let location = location.map(str::trim).unwrap_or("");
    if location.is_empty() || location.eq_ignore_ascii_case("null") || !location.starts_with("http")
    {
        return Err(ProbeErrorKind::RedirectMissing);
    }
    if !validator.is_valid_url(location) {
        return Err(ProbeErrorKind::RedirectInvalid(location.to_string()));
    }
    url::Url::parse(location)
        .map(|u| u.to_string())
        .map_err(|_| ProbeErrorKind::RedirectInvalid(location.to_string()))
}
