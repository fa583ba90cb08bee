//! Mirror Proxy Library
//!
//! A reverse proxy that exposes one fixed upstream origin under a path
//! prefix and rewrites responses so the upstream's absolute links and
//! redirects point back through the proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌───────────────────────────────────────────────┐
//!                       │                 MIRROR PROXY                  │
//!                       │                                               │
//!   Client Request      │  ┌────────┐   ┌─────────┐   ┌─────────────┐  │
//!   ────────────────────┼─▶│  http  │──▶│ rewrite │──▶│  upstream   │──┼──▶ Fixed
//!                       │  │ server │   │  path   │   │   client    │  │    Origin
//!                       │  └────────┘   └─────────┘   └──────┬──────┘  │
//!                       │                                    │         │
//!   Client Response     │  ┌────────┐   ┌─────────────┐      ▼         │
//!   ◀───────────────────┼──│  http  │◀──│   rewrite   │◀── buffered    │
//!                       │  │response│   │content+hdrs │    response    │
//!                       │  └────────┘   └─────────────┘                │
//!                       │                                               │
//!                       │  Cross-cutting: config, observability,        │
//!                       │  lifecycle                                    │
//!                       └───────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod rewrite;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
