//! Human-readable reporting.
//!
//! Pure formatting over a finished `Diagnosis` (or a fatal error). The same
//! text goes to stdout in the standalone mode and into the HTTP body in the
//! web mode.

pub mod text;

pub use text::{render_banner, render_failure, render_report, Mode};
