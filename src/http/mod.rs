//! HTTP surface for the interactive mode.
//!
//! # Data Flow
//! ```text
//! GET / | /debug_ip | /debug_ip.php
//!     → request ID + trace span + timeout (tower-http)
//!     → server.rs (headers + peer → RequestContext → Doctor)
//!     → text/plain report
//! ```

pub mod server;

pub use server::HttpServer;
