//! Configuration validation.
//!
//! Serde handles the syntax; this pass checks values that parse but make no
//! sense (zero timeouts, relative panel paths, unparseable addresses).
//! All problems are collected, not just the first.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use tracing::level_filters::LevelFilter;
use url::Url;

use crate::config::schema::DebugConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted field path, e.g. `lookup.url`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DebugConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_absolute(&mut errors, "panel.helpers_path", &config.panel.helpers_path);
    check_absolute(&mut errors, "panel.bin_dir", &config.panel.bin_dir);

    if config.panel.use_sudo && config.panel.sudo_path.trim().is_empty() {
        errors.push(ValidationError::new("panel.sudo_path", "must not be empty when use_sudo is set"));
    }
    if config.panel.command_timeout_secs == 0 {
        errors.push(ValidationError::new("panel.command_timeout_secs", "must be greater than 0"));
    }

    match Url::parse(&config.lookup.url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "lookup.url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("lookup.url", e.to_string())),
    }
    if config.lookup.timeout_secs == 0 {
        errors.push(ValidationError::new("lookup.timeout_secs", "must be greater than 0"));
    }
    if config.lookup.fallback_address.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::new(
            "lookup.fallback_address",
            format!("'{}' is not an IP address", config.lookup.fallback_address),
        ));
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be greater than 0"));
    }

    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!(
                "'{}' is not one of off, error, warn, info, debug, trace",
                config.observability.log_level
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_absolute(errors: &mut Vec<ValidationError>, field: &'static str, path: &Path) {
    if !path.is_absolute() {
        errors.push(ValidationError::new(
            field,
            format!("'{}' must be an absolute path", path.display()),
        ));
    }
}
