//! Response rewriting subsystem.
//!
//! # Data Flow
//! ```text
//! upstream response (status, headers, buffered body)
//!     → content.rs (classify by content-type, rewrite origin URLs in HTML)
//!     → headers.rs (strip embedding blockers, rewrite Location, reframe)
//!     → http/response.rs (emit downstream)
//!
//! per request:
//!     base.rs resolves the externally visible proxy base URL
//!     path.rs maps inbound paths to upstream paths and back
//! ```
//!
//! # Design Decisions
//! - Only text/html bodies are rewritten; everything else passes through
//!   byte-for-byte so binary formats are never corrupted
//! - Replacement is literal substring substitution, never regex
//! - The sanitized header map is built fresh, never mutated in place

pub mod base;
pub mod content;
pub mod headers;
pub mod path;

pub use base::ProxyBase;
pub use content::{classify, rewrite_html, Classification, RewriteTargets};
pub use headers::sanitize_response_headers;
pub use path::PathTranslator;
