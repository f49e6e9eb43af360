//! Unit tests for URL normalization, domain titles and shared-text
//! extraction.

use linksafe::services::url_service::{domain_title, extract_url_from_text, normalize_url};
use linksafe::types::errors::ValidationError;
use rstest::rstest;

#[rstest]
#[case("example.com", "https://example.com")]
#[case("  example.com/path?q=1 ", "https://example.com/path?q=1")]
#[case("http://example.com", "http://example.com")]
#[case("HTTPS://Example.com/A", "HTTPS://Example.com/A")]
#[case("sub.domain.io:8080/x", "https://sub.domain.io:8080/x")]
fn test_normalize_url_accepts(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(normalize_url(input).unwrap(), expected);
}

#[rstest]
#[case("", ValidationError::EmptyUrl)]
#[case("   \t", ValidationError::EmptyUrl)]
#[case("not a url", ValidationError::InvalidUrl("not a url".to_string()))]
#[case("https://", ValidationError::InvalidUrl("https://".to_string()))]
fn test_normalize_url_rejects(#[case] input: &str, #[case] expected: ValidationError) {
    assert_eq!(normalize_url(input), Err(expected));
}

#[rstest]
#[case("https://www.example.com/page", "example.com")]
#[case("http://news.ycombinator.com?id=1", "news.ycombinator.com")]
#[case("https://docs.rs#top", "docs.rs")]
#[case("HTTPS://WWW.Rust-Lang.org/", "Rust-Lang.org")]
#[case("https://", "https://")]
fn test_domain_title(#[case] url: &str, #[case] expected: &str) {
    assert_eq!(domain_title(url), expected);
}

#[rstest]
#[case("Look at this https://example.com/a b", Some("https://example.com/a"))]
#[case("HTTP://Caps.example ok", Some("HTTP://Caps.example"))]
#[case("first http://a.com then https://b.com", Some("http://a.com"))]
#[case("no link here", None)]
#[case("ftp://files.example.com", None)]
fn test_extract_url_from_text(#[case] text: &str, #[case] expected: Option<&str>) {
    assert_eq!(extract_url_from_text(text).as_deref(), expected);
}

#[test]
fn test_domain_title_handles_multibyte_input() {
    assert_eq!(domain_title("https://münchen.de/ü"), "münchen.de");
    assert_eq!(domain_title("ü"), "ü");
}
