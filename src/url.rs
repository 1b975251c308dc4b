//! URL Decomposition
//!
//! Splits a raw URL into the three components the feature extractor
//! inspects: host, path segments and query parameters. Components are cut
//! from the input with the RFC 3986 generic syntax and are not normalized:
//! the host stays as written, and `.`/`..` segments are kept. Decomposition
//! never fails; a component that is absent comes back empty.

use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use ::url::form_urlencoded;

/// Components of one URL, owned by a single extraction call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecomposedUrl {
    /// Host as written in the input, empty without an authority
    pub host: String,
    /// Non-empty, percent-decoded path segments in order
    pub path_segments: Vec<String>,
    /// Query parameters; a repeated name keeps its last value
    pub query_params: HashMap<String, String>,
}

/// Borrowed RFC 3986 components of a raw URL
#[derive(Debug, Default, PartialEq, Eq)]
struct Components<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> Components<'a> {
    fn split(raw: &'a str) -> Self {
        let (rest, fragment) = match raw.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (raw, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query)),
            None => (rest, None),
        };

        let (scheme, rest) = match rest.split_once(':') {
            Some((scheme, tail)) if is_scheme(scheme) => (Some(scheme), tail),
            _ => (None, rest),
        };

        let (authority, path) = match rest.strip_prefix("//") {
            Some(tail) => {
                let end = tail.find('/').unwrap_or(tail.len());
                (Some(&tail[..end]), &tail[end..])
            }
            None => (None, rest),
        };

        Self { scheme, authority, path, query, fragment }
    }
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Host part of an authority: userinfo and port removed, case kept
fn host_of(authority: &str) -> &str {
    let host_port = authority
        .rsplit_once('@')
        .map(|(_, host_port)| host_port)
        .unwrap_or(authority);

    if host_port.starts_with('[') {
        // IP literal; without the closing bracket there is no usable host
        return match host_port.find(']') {
            Some(end) => &host_port[..=end],
            None => "",
        };
    }

    match host_port.rsplit_once(':') {
        Some((host, _port)) => host,
        None => host_port,
    }
}

impl DecomposedUrl {
    /// Decompose a raw URL string
    pub fn parse(raw: &str) -> Self {
        let parts = Components::split(raw);
        tracing::trace!(scheme = ?parts.scheme, fragment = ?parts.fragment, "split URL");

        let host = parts.authority.map(host_of).unwrap_or_default().to_string();

        let path_segments = parts
            .path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
            .collect();

        let query_params = parts
            .query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Self { host, path_segments, query_params }
    }

    /// Directory string: a leading slash followed by the joined segments
    pub fn directory(&self) -> String {
        format!("/{}", self.path_segments.join("/"))
    }

    /// Last path segment, or empty
    pub fn filename(&self) -> &str {
        self.path_segments.last().map(String::as_str).unwrap_or("")
    }
}

/// Decompose a raw URL string into host, path segments and query parameters
pub fn decompose(raw: &str) -> DecomposedUrl {
    DecomposedUrl::parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url() {
        let d = decompose("http://example.com/path/to/file.php?id=1&name=test");
        assert_eq!(d.host, "example.com");
        assert_eq!(d.path_segments, vec!["path", "to", "file.php"]);
        assert_eq!(d.query_params.get("id").map(String::as_str), Some("1"));
        assert_eq!(d.query_params.get("name").map(String::as_str), Some("test"));
        assert_eq!(d.directory(), "/path/to/file.php");
        assert_eq!(d.filename(), "file.php");
    }

    #[test]
    fn test_components_split() {
        let c = Components::split("https://u:p@Host.io:8443/a/b?x=1#frag");
        assert_eq!(c.scheme, Some("https"));
        assert_eq!(c.authority, Some("u:p@Host.io:8443"));
        assert_eq!(c.path, "/a/b");
        assert_eq!(c.query, Some("x=1"));
        assert_eq!(c.fragment, Some("frag"));

        assert_eq!(Components::split(""), Components::default());
    }

    #[test]
    fn test_host_strips_userinfo_and_port() {
        assert_eq!(decompose("http://user:pw@h.io:8080/a").host, "h.io");
        assert_eq!(decompose("http://a@b@evil.com/").host, "evil.com");
        assert_eq!(decompose("http://[::1]:8080/x").host, "[::1]");
    }

    #[test]
    fn test_host_kept_as_written() {
        assert_eq!(decompose("HTTP://EXAMPLE.COM/").host, "EXAMPLE.COM");
        assert_eq!(decompose("http://bücher.de/login").host, "bücher.de");
        assert_eq!(decompose("http://ex%61mple.com/").host, "ex%61mple.com");
    }

    #[test]
    fn test_empty_segments_dropped() {
        let d = decompose("https://example.com//a///b/");
        assert_eq!(d.path_segments, vec!["a", "b"]);

        let root = decompose("https://example.com/");
        assert!(root.path_segments.is_empty());
        assert_eq!(root.directory(), "/");
        assert_eq!(root.filename(), "");
    }

    #[test]
    fn test_dot_segments_kept() {
        let d = decompose("http://a.com/x/../../etc/./passwd");
        assert_eq!(d.path_segments, vec!["x", "..", "..", "etc", ".", "passwd"]);
    }

    #[test]
    fn test_query_last_value_wins() {
        let d = decompose("http://example.com/?a=1&a=2&b=x+y%21");
        assert_eq!(d.query_params.len(), 2);
        assert_eq!(d.query_params["a"], "2");
        assert_eq!(d.query_params["b"], "x y!");
    }

    #[test]
    fn test_path_segments_decoded() {
        let d = decompose("http://example.com/a%20b/c%2Fd");
        assert_eq!(d.path_segments, vec!["a b", "c/d"]);
    }

    #[test]
    fn test_scheme_less_has_no_host() {
        let d = decompose("example.com/path?q=1");
        assert_eq!(d.host, "");
        assert_eq!(d.path_segments, vec!["example.com", "path"]);
        assert_eq!(d.query_params["q"], "1");

        let with_port = decompose("paypal.com:443/login.php");
        assert_eq!(with_port.host, "");
        assert_eq!(with_port.path_segments, vec!["443", "login.php"]);
    }

    #[test]
    fn test_scheme_relative_keeps_host() {
        let d = decompose("//cdn.example.org/lib.js");
        assert_eq!(d.host, "cdn.example.org");
        assert_eq!(d.path_segments, vec!["lib.js"]);

        assert_eq!(decompose("//relative.invalid/x").host, "relative.invalid");
    }

    #[test]
    fn test_malformed_degrades_to_empty() {
        assert_eq!(decompose(""), DecomposedUrl::default());
        assert_eq!(decompose("http://[::1/broken").host, "");

        let d = decompose("weird@@url!!with##chars");
        assert_eq!(d.host, "");
        assert_eq!(d.path_segments, vec!["weird@@url!!with"]);
        assert!(d.query_params.is_empty());
    }

    #[test]
    fn test_opaque_url_keeps_path() {
        let mail = decompose("mailto:someone@example.com");
        assert_eq!(mail.host, "");
        assert_eq!(mail.path_segments, vec!["someone@example.com"]);

        let js = decompose("javascript:alert('x.y')");
        assert_eq!(js.host, "");
        assert_eq!(js.path_segments, vec!["alert('x.y')"]);
    }
}
