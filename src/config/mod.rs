//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI overrides applied in main
//!     → DebugConfig (immutable for the rest of the run)
//! ```
//!
//! # Design Decisions
//! - Every field has a default matching a stock HestiaCP install
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{DebugConfig, LogFormat, LookupConfig, ObservabilityConfig, PanelConfig, ServerConfig};
