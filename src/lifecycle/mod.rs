//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Standalone: load config → run one diagnosis → exit 0 / 1
//! Web:        load config → bind → serve until signals.rs fires → drain → exit
//! ```

pub mod signals;

pub use signals::shutdown_signal;
