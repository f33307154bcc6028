//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems emit tracing events
//!     → logging.rs (EnvFilter + fmt layer, pretty or JSON, on stderr)
//! Web mode additionally:
//!     → tower-http TraceLayer spans, one per request, with request IDs
//! ```

pub mod logging;

pub use logging::init_logging;
