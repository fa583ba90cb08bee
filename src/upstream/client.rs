//! Upstream origin client.
//!
//! # Responsibilities
//! - Issue the outbound request to the fixed upstream for an inbound request
//! - Filter forwarded headers and force the configured Accept-Language
//! - Buffer the upstream body to completion, bounded by the configured cap
//!
//! # Design Decisions
//! - Redirects are never followed: the proxy must see 3xx responses so it
//!   can rewrite Location itself
//! - Accept-Encoding is stripped so bodies arrive uncompressed and the
//!   rewriter sees plain text
//! - TLS certificate verification is always on

use std::time::Duration;

use axum::body::Bytes;
use axum::http::header::{ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONTENT_LENGTH, HOST};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use thiserror::Error;

use crate::config::ProxyConfig;

/// Hop-by-hop request headers never forwarded upstream.
const HOP_BY_HOP: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "upgrade",
];

/// Errors surfaced by the origin client. Both map to a 502 downstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, DNS, TLS, or timeout failure reaching the upstream.
    /// Upstream responses with error statuses are NOT this: 4xx/5xx pass
    /// through as normal responses.
    #[error("upstream unavailable: {0}")]
    Unavailable(#[source] reqwest::Error),

    /// The upstream body exceeded the configured buffer cap.
    #[error("upstream body exceeded {limit} bytes")]
    BodyTooLarge { limit: usize },
}

/// A fully buffered upstream response.
///
/// The body bytes are immutable once buffered; rewriting produces a new
/// buffer rather than mutating this one.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// HTTP client bound to the single fixed upstream origin.
///
/// Constructed once at startup; shared read-only between request tasks.
pub struct OriginClient {
    http: reqwest::Client,
    origin: String,
    accept_language: HeaderValue,
    max_body_bytes: usize,
}

impl OriginClient {
    /// Build the client from the immutable configuration.
    pub fn new(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .no_proxy();
        if config.timeouts.connect_secs > 0 {
            builder = builder.connect_timeout(Duration::from_secs(config.timeouts.connect_secs));
        }
        if config.timeouts.request_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeouts.request_secs));
        }
        let http = builder.build()?;

        let mut origin = config.upstream.origin.clone();
        while origin.ends_with('/') {
            origin.pop();
        }
        let accept_language = HeaderValue::from_str(&config.upstream.accept_language)
            .unwrap_or_else(|_| HeaderValue::from_static("en-US,en;q=0.9"));

        Ok(Self {
            http,
            origin,
            accept_language,
            max_body_bytes: config.limits.max_body_bytes,
        })
    }

    /// The canonical upstream origin string.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Forward a translated request to the upstream and buffer its response.
    ///
    /// Any upstream status is a success here; only transport failures and
    /// the body cap produce errors.
    pub async fn forward(
        &self,
        method: Method,
        upstream_path: &str,
        query: Option<&str>,
        inbound_headers: &HeaderMap,
        body: Bytes,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = match query {
            Some(q) => format!("{}{}?{}", self.origin, upstream_path, q),
            None => format!("{}{}", self.origin, upstream_path),
        };

        let headers = self.filter_request_headers(inbound_headers);

        let mut request = self.http.request(method, url).headers(headers);
        if !body.is_empty() {
            request = request.body(body);
        }

        let mut response = request.send().await.map_err(UpstreamError::Unavailable)?;
        let status = response.status();
        let headers = response.headers().clone();

        let mut buffered: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(UpstreamError::Unavailable)?
        {
            if buffered.len() + chunk.len() > self.max_body_bytes {
                // Dropping `response` aborts the upstream connection.
                return Err(UpstreamError::BodyTooLarge {
                    limit: self.max_body_bytes,
                });
            }
            buffered.extend_from_slice(&chunk);
        }

        Ok(UpstreamResponse {
            status,
            headers,
            body: Bytes::from(buffered),
        })
    }

    /// Build the outbound header set from the inbound one.
    ///
    /// Host is dropped (the client derives it from the URL, so the upstream
    /// sees its own hostname), hop-by-hop and framing headers are dropped,
    /// Accept-Encoding is dropped so the body arrives uncompressed, and
    /// Accept-Language is forced to the configured default. Everything else,
    /// cookies included, is forwarded for correct upstream behavior.
    fn filter_request_headers(&self, inbound: &HeaderMap) -> HeaderMap {
        let mut filtered = HeaderMap::with_capacity(inbound.len());
        for (name, value) in inbound {
            if name == HOST
                || name == CONTENT_LENGTH
                || name == ACCEPT_ENCODING
                || name == ACCEPT_LANGUAGE
                || HOP_BY_HOP.contains(&name.as_str())
            {
                continue;
            }
            filtered.append(name.clone(), value.clone());
        }
        filtered.insert(ACCEPT_LANGUAGE, self.accept_language.clone());
        filtered
    }
}
