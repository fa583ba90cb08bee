//! Response header sanitization.
//!
//! # Responsibilities
//! - Strip headers that block cross-origin embedding of the proxied content
//! - Rewrite Location headers pointing at the upstream origin
//! - Drop framing headers so the emitter can recompute content-length
//!
//! # Design Decisions
//! - A fresh header map is built from the upstream map; the upstream map is
//!   never mutated, avoiding order-of-mutation bugs
//! - Location is rewritten for every response class: redirects happen for
//!   non-HTML resources too

use axum::http::header::{CONTENT_LENGTH, LOCATION};
use axum::http::{HeaderMap, HeaderValue};

use crate::rewrite::base::ProxyBase;
use crate::rewrite::path::PathTranslator;

/// Headers removed unconditionally: they prevent the proxied content from
/// being framed or embedded cross-origin, which is the purpose of the proxy.
pub const STRIPPED_HEADERS: [&str; 2] = ["content-security-policy", "x-frame-options"];

/// Framing headers dropped because the response is re-framed from a fully
/// buffered body; content-length is recomputed by the emitter.
const FRAMING_HEADERS: [&str; 3] = ["content-length", "transfer-encoding", "connection"];

/// Build the sanitized outbound header map from an upstream response's
/// headers.
///
/// Everything passes through unmodified, cookies and caching headers
/// included, except the embedding blockers, the framing headers, and a
/// `Location` that starts with the upstream origin, which is remapped under
/// the proxy base.
pub fn sanitize_response_headers(
    upstream: &HeaderMap,
    translator: &PathTranslator,
    base: &ProxyBase,
) -> HeaderMap {
    let mut sanitized = HeaderMap::with_capacity(upstream.len());

    for (name, value) in upstream {
        // HeaderName::as_str is always lowercase.
        let name_str = name.as_str();
        if STRIPPED_HEADERS.contains(&name_str) || FRAMING_HEADERS.contains(&name_str) {
            continue;
        }
        if name == LOCATION {
            if let Some(rewritten) = value
                .to_str()
                .ok()
                .and_then(|loc| translator.to_proxy(loc, base))
            {
                if let Ok(value) = HeaderValue::from_str(&rewritten) {
                    sanitized.append(LOCATION, value);
                    continue;
                }
            }
        }
        sanitized.append(name.clone(), value.clone());
    }

    sanitized
}

/// Set the final content-length from the emitted body's byte length.
pub fn set_content_length(headers: &mut HeaderMap, body_len: usize) {
    headers.insert(CONTENT_LENGTH, HeaderValue::from(body_len));
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{CONTENT_TYPE, SET_COOKIE};

    fn translator() -> PathTranslator {
        PathTranslator::new("https://upstream.example", "/g")
    }

    fn base() -> ProxyBase {
        ProxyBase::from_parts("http", "proxy.local:3000", "/g")
    }

    #[test]
    fn test_embedding_blockers_removed() {
        let mut upstream = HeaderMap::new();
        upstream.insert("content-security-policy", "default-src 'self'".parse().unwrap());
        upstream.insert("x-frame-options", "DENY".parse().unwrap());
        upstream.insert(CONTENT_TYPE, "text/html".parse().unwrap());

        let out = sanitize_response_headers(&upstream, &translator(), &base());
        assert!(!out.contains_key("content-security-policy"));
        assert!(!out.contains_key("x-frame-options"));
        assert_eq!(out.get(CONTENT_TYPE).unwrap(), "text/html");
    }

    #[test]
    fn test_cookies_and_caching_pass_through() {
        let mut upstream = HeaderMap::new();
        upstream.append(SET_COOKIE, "a=1; Path=/".parse().unwrap());
        upstream.append(SET_COOKIE, "b=2; Path=/".parse().unwrap());
        upstream.insert("cache-control", "no-store".parse().unwrap());

        let out = sanitize_response_headers(&upstream, &translator(), &base());
        assert_eq!(out.get_all(SET_COOKIE).iter().count(), 2);
        assert_eq!(out.get("cache-control").unwrap(), "no-store");
    }

    #[test]
    fn test_framing_headers_dropped_and_recomputed() {
        let mut upstream = HeaderMap::new();
        upstream.insert(CONTENT_LENGTH, "999".parse().unwrap());
        upstream.insert("transfer-encoding", "chunked".parse().unwrap());

        let mut out = sanitize_response_headers(&upstream, &translator(), &base());
        assert!(!out.contains_key(CONTENT_LENGTH));
        assert!(!out.contains_key("transfer-encoding"));

        set_content_length(&mut out, 42);
        assert_eq!(out.get(CONTENT_LENGTH).unwrap(), "42");
    }

    #[test]
    fn test_upstream_location_rewritten() {
        let mut upstream = HeaderMap::new();
        upstream.insert(LOCATION, "https://upstream.example/login".parse().unwrap());

        let out = sanitize_response_headers(&upstream, &translator(), &base());
        assert_eq!(
            out.get(LOCATION).unwrap(),
            "http://proxy.local:3000/g/login"
        );
    }

    #[test]
    fn test_foreign_location_untouched() {
        let mut upstream = HeaderMap::new();
        upstream.insert(LOCATION, "https://accounts.example/oauth".parse().unwrap());

        let out = sanitize_response_headers(&upstream, &translator(), &base());
        assert_eq!(out.get(LOCATION).unwrap(), "https://accounts.example/oauth");
    }

    #[test]
    fn test_relative_location_untouched() {
        let mut upstream = HeaderMap::new();
        upstream.insert(LOCATION, "/login".parse().unwrap());

        let out = sanitize_response_headers(&upstream, &translator(), &base());
        assert_eq!(out.get(LOCATION).unwrap(), "/login");
    }
}
