//! Proxy base URL resolution.
//!
//! # Responsibilities
//! - Derive the externally visible scheme://host/prefix the proxy is
//!   reachable at for the current request
//! - Honor standard forwarding headers set by TLS-terminating front ends
//!
//! # Design Decisions
//! - Resolved per request, never cached: one proxy instance may be reached
//!   through several front-end hostnames and protocols at once

use axum::http::header::HOST;
use axum::http::HeaderMap;

/// The externally visible base URL of the proxy, including the mount prefix.
///
/// E.g. `https://mirror.example/g`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyBase {
    url: String,
}

/// First element of a comma-separated header value, trimmed.
fn first_header_value(value: &str) -> &str {
    value.split(',').next().unwrap_or(value).trim()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(first_header_value)
        .filter(|v| !v.is_empty())
}

impl ProxyBase {
    /// Resolve the base URL from a request's forwarding metadata.
    ///
    /// Scheme comes from `x-forwarded-proto` when present, otherwise the
    /// connection's own scheme (the listener speaks plain HTTP). Host comes
    /// from `x-forwarded-host` when present, otherwise the `Host` header.
    pub fn resolve(headers: &HeaderMap, mount_prefix: &str) -> Self {
        let scheme = header_str(headers, "x-forwarded-proto").unwrap_or("http");
        let host = header_str(headers, "x-forwarded-host")
            .or_else(|| headers.get(HOST).and_then(|v| v.to_str().ok()))
            .unwrap_or("localhost");
        Self::from_parts(scheme, host, mount_prefix)
    }

    /// Build a base URL from already-resolved parts.
    pub fn from_parts(scheme: &str, host: &str, mount_prefix: &str) -> Self {
        Self {
            url: format!("{}://{}{}", scheme, host, mount_prefix),
        }
    }

    /// The resolved base as a string ("scheme://host/prefix").
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Display for ProxyBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_forwarded_headers_win() {
        let headers = headers(&[
            ("host", "127.0.0.1:3000"),
            ("x-forwarded-proto", "https"),
            ("x-forwarded-host", "mirror.example"),
        ]);
        let base = ProxyBase::resolve(&headers, "/g");
        assert_eq!(base.as_str(), "https://mirror.example/g");
    }

    #[test]
    fn test_falls_back_to_host_header_and_http() {
        let headers = headers(&[("host", "127.0.0.1:3000")]);
        let base = ProxyBase::resolve(&headers, "/g");
        assert_eq!(base.as_str(), "http://127.0.0.1:3000/g");
    }

    #[test]
    fn test_multi_valued_forwarding_uses_first() {
        let headers = headers(&[
            ("host", "internal:8080"),
            ("x-forwarded-host", "outer.example, inner.example"),
            ("x-forwarded-proto", "https, http"),
        ]);
        let base = ProxyBase::resolve(&headers, "/g");
        assert_eq!(base.as_str(), "https://outer.example/g");
    }

    #[test]
    fn test_resolution_varies_per_request() {
        let local = headers(&[("host", "localhost:3000")]);
        let fronted = headers(&[
            ("host", "localhost:3000"),
            ("x-forwarded-proto", "https"),
            ("x-forwarded-host", "public.example"),
        ]);
        assert_ne!(
            ProxyBase::resolve(&local, "/g"),
            ProxyBase::resolve(&fronted, "/g")
        );
    }
}
