//! Upstream communication subsystem.
//!
//! # Data Flow
//! ```text
//! translated path + filtered headers + inbound body
//!     → client.rs (reqwest request to the fixed origin)
//!     → full body buffered, bounded by limits.max_body_bytes
//!     → UpstreamResponse (status, headers, owned body bytes)
//! ```

pub mod client;

pub use client::{OriginClient, UpstreamError, UpstreamResponse};
