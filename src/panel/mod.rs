//! Panel configuration reader.
//!
//! # Data Flow
//! ```text
//! command.rs: [sudo] v-list-sys-config json
//!     → stdout lines (trailing whitespace stripped)
//!     → settings.rs (JSON → flat SystemSettings)
//! ```
//!
//! # Design Decisions
//! - One shot, no retries: a snapshot that cannot be read ends the diagnosis
//! - The command has a deadline
//! - Readers sit behind `SettingsSource` so the diagnosis can run on fixtures

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

pub mod command;
pub mod settings;

pub use command::CommandSource;
pub use settings::{parse_settings, SystemSettings, API, API_ALLOWED_IP, API_SYSTEM, NOT_SET};

/// Errors while reading the panel configuration. All are fatal.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("HestiaCP command not found at {}", .0.display())]
    CommandMissing(PathBuf),

    #[error("Failed to start HestiaCP command {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to execute HestiaCP command (exit code: {})", exit_code(.code))]
    CommandFailed { code: Option<i32>, output: String },

    #[error("HestiaCP command did not finish within {0} seconds")]
    Timeout(u64),

    #[error("Failed to parse HestiaCP configuration JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Failed to parse HestiaCP configuration JSON: empty configuration")]
    EmptyConfig,
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "killed by signal".to_string(),
    }
}

/// Source of a panel configuration snapshot.
pub trait SettingsSource: Send + Sync {
    fn load(&self) -> impl Future<Output = Result<SystemSettings, PanelError>> + Send;
}
