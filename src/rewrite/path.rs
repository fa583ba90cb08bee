//! Path translation between the proxy mount and the upstream.
//!
//! # Responsibilities
//! - Strip the mount prefix from inbound paths (/g/chat → /chat)
//! - Map upstream-absolute locations back under the proxy base
//!
//! # Design Decisions
//! - Locations that do not start with the exact upstream origin string pass
//!   through untouched: relative redirects already resolve correctly against
//!   the proxy's own origin

use crate::rewrite::base::ProxyBase;

/// Maps paths across the mount-prefix boundary.
///
/// Constructed once at startup from the immutable upstream configuration and
/// shared read-only between request tasks.
#[derive(Debug, Clone)]
pub struct PathTranslator {
    origin: String,
    mount_prefix: String,
}

impl PathTranslator {
    /// Create a translator for the given upstream origin and mount prefix.
    ///
    /// A trailing slash on the origin is dropped so prefix comparisons are
    /// exact ("https://host/" and "https://host" configure the same origin).
    pub fn new(origin: impl Into<String>, mount_prefix: impl Into<String>) -> Self {
        let mut origin = origin.into();
        while origin.ends_with('/') {
            origin.pop();
        }
        Self {
            origin,
            mount_prefix: mount_prefix.into(),
        }
    }

    /// The canonical upstream origin string ("https://host").
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The mount prefix ("/g").
    pub fn mount_prefix(&self) -> &str {
        &self.mount_prefix
    }

    /// Map an inbound path to the path requested from the upstream.
    ///
    /// The mount prefix is stripped; the bare mount path maps to "/".
    pub fn to_upstream(&self, inbound_path: &str) -> String {
        let rest = inbound_path
            .strip_prefix(&self.mount_prefix)
            .unwrap_or(inbound_path);
        if rest.is_empty() {
            "/".to_string()
        } else {
            rest.to_string()
        }
    }

    /// Map an upstream-absolute URL back under the proxy base.
    ///
    /// Returns `None` unless the location starts with the exact upstream
    /// origin string.
    pub fn to_proxy(&self, upstream_location: &str, base: &ProxyBase) -> Option<String> {
        upstream_location
            .strip_prefix(&self.origin)
            .map(|rest| format!("{}{}", base.as_str(), rest))
    }
}
