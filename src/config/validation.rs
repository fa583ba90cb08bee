//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream origin is a bare scheme+host URL
//! - Check the mount prefix shape
//! - Validate value ranges (body cap > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic validation failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Origin could not be parsed as a URL at all.
    #[error("upstream.origin is not a valid URL: {0}")]
    InvalidOrigin(String),

    /// Origin parsed but uses a scheme other than http/https.
    #[error("upstream.origin must use http or https: {0}")]
    OriginScheme(String),

    /// Origin carries a path, query, or fragment. The origin must be bare
    /// scheme+host so literal substring rewriting stays unambiguous.
    #[error("upstream.origin must be scheme+host only: {0}")]
    OriginNotBare(String),

    /// Mount prefix does not look like "/name".
    #[error("upstream.mount_prefix must start with '/', have at least one segment, and not end with '/': {0}")]
    MountPrefix(String),

    /// Bind address is not a socket address.
    #[error("listener.bind_address is not a valid socket address: {0}")]
    BindAddress(String),

    /// The response buffer cap is zero.
    #[error("limits.max_body_bytes must be greater than zero")]
    BodyCap,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.upstream.origin) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::OriginScheme(config.upstream.origin.clone()));
            }
            if !matches!(url.path(), "" | "/") || url.query().is_some() || url.fragment().is_some() {
                errors.push(ValidationError::OriginNotBare(config.upstream.origin.clone()));
            }
        }
        Err(_) => errors.push(ValidationError::InvalidOrigin(config.upstream.origin.clone())),
    }

    let prefix = &config.upstream.mount_prefix;
    if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
        errors.push(ValidationError::MountPrefix(prefix.clone()));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::BodyCap);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
