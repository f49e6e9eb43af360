//! URL handling for links coming from the add/edit flow and from share intents.
//!
//! Shared text is untrusted: it may carry a URL inside a sentence, omit the
//! scheme, or not be a URL at all.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::types::errors::ValidationError;

static SHARED_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://\S+").expect("valid shared url regex"));

/// Trims `raw`, prefixes `https://` unless it already carries an http(s)
/// scheme, and checks that the result parses with a host.
///
/// The returned string is the normalized input, not the parser's
/// re-serialization, so `example.com` becomes `https://example.com`
/// without a trailing slash.
pub fn normalize_url(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }

    let lowered = trimmed.to_ascii_lowercase();
    let normalized = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed =
        Url::parse(&normalized).map_err(|_| ValidationError::InvalidUrl(trimmed.to_string()))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(normalized),
        _ => Err(ValidationError::InvalidUrl(trimmed.to_string())),
    }
}

/// Display title derived from a URL: scheme and a leading `www.` removed,
/// cut at the first `/`, `?` or `#`. Falls back to the input.
pub fn domain_title(url: &str) -> String {
    let mut rest = url.trim();
    for scheme in ["https://", "http://"] {
        if has_prefix_ignore_case(rest, scheme) {
            rest = &rest[scheme.len()..];
            break;
        }
    }
    if has_prefix_ignore_case(rest, "www.") {
        rest = &rest[4..];
    }

    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let domain = &rest[..end];
    if domain.is_empty() {
        url.to_string()
    } else {
        domain.to_string()
    }
}

fn has_prefix_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// First `http(s)://` URL found in free text handed over by a share intent.
pub fn extract_url_from_text(text: &str) -> Option<String> {
    SHARED_URL_RE
        .find(text)
        .map(|m| m.as_str().to_string())
}
