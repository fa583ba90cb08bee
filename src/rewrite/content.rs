//! Body classification and origin URL rewriting.
//!
//! # Responsibilities
//! - Classify responses as rewritable (text/html) or opaque by content type
//! - Replace every absolute occurrence of the upstream origin with the proxy
//!   base, in both literal and backslash-escaped form
//!
//! # Design Decisions
//! - Literal substring replacement, left-to-right, non-overlapping; no regex
//! - The escaped form is replaced before the unescaped form so one pass can
//!   never partially rewrite the other's matches
//! - Escaping style is preserved: escaped occurrences get the escaped proxy
//!   base, unescaped occurrences the unescaped one, so JSON embedded in HTML
//!   stays syntactically valid

use crate::rewrite::base::ProxyBase;

/// Rewrite strategy for an upstream response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// text/html: carries absolute upstream URLs worth rewriting.
    Rewritable,
    /// Everything else: passed through byte-for-byte.
    Opaque,
}

/// Classify a response from its declared content type.
pub fn classify(content_type: Option<&str>) -> Classification {
    match content_type {
        Some(value) if value.to_ascii_lowercase().contains("text/html") => {
            Classification::Rewritable
        }
        _ => Classification::Opaque,
    }
}

/// The literal string forms replaced during a body rewrite.
///
/// Built per request: the proxy base depends on the inbound request's
/// forwarding metadata.
#[derive(Debug, Clone)]
pub struct RewriteTargets {
    origin: String,
    origin_escaped: String,
    base: String,
    base_escaped: String,
}

impl RewriteTargets {
    /// Pair the upstream origin with the resolved proxy base.
    pub fn new(origin: &str, base: &ProxyBase) -> Self {
        Self {
            origin: origin.to_string(),
            origin_escaped: escape_slashes(origin),
            base: base.as_str().to_string(),
            base_escaped: escape_slashes(base.as_str()),
        }
    }
}

/// Backslash-escape slashes the way script/JSON payloads embed URLs
/// ("https://h" → "https:\/\/h").
fn escape_slashes(s: &str) -> String {
    s.replace('/', "\\/")
}

/// Rewrite every occurrence of the upstream origin in an HTML body.
///
/// Returns `None` when the buffer is not valid UTF-8; the caller falls back
/// to byte-for-byte passthrough rather than failing the request.
pub fn rewrite_html(body: &[u8], targets: &RewriteTargets) -> Option<String> {
    let text = std::str::from_utf8(body).ok()?;
    // Escaped occurrences first: their replacement text contains no unescaped
    // origin, so the second pass cannot touch it.
    let text = text.replace(&targets.origin_escaped, &targets.base_escaped);
    Some(text.replace(&targets.origin, &targets.base))
}
