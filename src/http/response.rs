//! Response transformation and emission.
//!
//! # Responsibilities
//! - Classify the buffered upstream response and rewrite HTML bodies
//! - Sanitize headers and recompute content-length
//! - Emit status, headers, and body downstream as one framed response
//!
//! # Design Decisions
//! - The full response is assembled before the first byte is written: no
//!   partial responses are ever emitted
//! - A body that declares text/html but is not valid UTF-8 passes through
//!   byte-for-byte instead of failing the request

use axum::body::{Body, Bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;

use crate::rewrite::{
    classify, rewrite_html, sanitize_response_headers, Classification, PathTranslator, ProxyBase,
    RewriteTargets,
};
use crate::upstream::UpstreamResponse;

/// Transform a buffered upstream response into the downstream response.
///
/// Rewritable bodies get the origin-to-proxy-base substitution; opaque bodies
/// pass through untouched. Location and the embedding blockers are handled
/// for both classes. Content-length is always the emitted body's byte length.
pub fn transform_response(
    upstream: UpstreamResponse,
    translator: &PathTranslator,
    base: &ProxyBase,
) -> Response<Body> {
    let UpstreamResponse {
        status,
        headers,
        body,
    } = upstream;

    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let body = match classify(content_type) {
        Classification::Rewritable => {
            let targets = RewriteTargets::new(translator.origin(), base);
            match rewrite_html(&body, &targets) {
                Some(rewritten) => Bytes::from(rewritten),
                // Declared HTML but not valid UTF-8: pass through untouched.
                None => body,
            }
        }
        Classification::Opaque => body,
    };

    let mut sanitized = sanitize_response_headers(&headers, translator, base);
    crate::rewrite::headers::set_content_length(&mut sanitized, body.len());

    let mut builder = Response::builder().status(status);
    if let Some(headers) = builder.headers_mut() {
        *headers = sanitized;
    }
    builder
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response())
}
