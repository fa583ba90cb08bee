//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build client → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl-C → trigger broadcast → server drains in-flight requests → Exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
