//! Troubleshooting findings derived from a completed diagnosis.

use std::path::Path;

use crate::panel::{SystemSettings, API, API_ALLOWED_IP, API_SYSTEM, NOT_SET};
use crate::security::{listed_verbatim, truthy, ALLOW_ALL};

/// A problem worth telling the operator about, with its fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// `API` is anything but `yes`.
    LegacyApiDisabled { current: String, fix: String },
    /// `API_SYSTEM` is missing or `0`.
    ApiSystemDisabled,
    /// The detected IP is not in the raw `API_ALLOWED_IP` split.
    IpNotAllowed { ip: String, fix: String },
}

/// Evaluate the fixed set of troubleshooting predicates.
pub fn collect(settings: &SystemSettings, detected: &[u8], change_command: &Path) -> Vec<Finding> {
    let mut findings = Vec::new();

    if settings.get(API) != Some("yes") {
        findings.push(Finding::LegacyApiDisabled {
            current: settings.display(API).to_string(),
            fix: format!("sudo {} API yes", change_command.display()),
        });
    }

    if settings.get(API_SYSTEM).unwrap_or("0") == "0" {
        findings.push(Finding::ApiSystemDisabled);
    }

    let allowed = settings.get(API_ALLOWED_IP).unwrap_or("");
    if truthy(detected) && allowed != ALLOW_ALL && !listed_verbatim(allowed, detected) {
        let ip = String::from_utf8_lossy(detected);
        // Empty setting: the IP alone. `,<ip>` would store a blank entry.
        let list = if allowed.is_empty() {
            ip.to_string()
        } else {
            format!("{allowed},{ip}")
        };
        findings.push(Finding::IpNotAllowed {
            ip: ip.to_string(),
            fix: format!("sudo {} {API_ALLOWED_IP} \"{list}\"", change_command.display()),
        });
    }

    findings
}

impl Finding {
    /// Headline and fix line, as printed.
    pub fn lines(&self) -> (String, String) {
        match self {
            Finding::LegacyApiDisabled { current, fix } => (
                format!("Legacy API is disabled (API='{current}')"),
                format!("Fix: {fix}"),
            ),
            Finding::ApiSystemDisabled => (
                "API System is disabled".to_string(),
                "Fix: Enable via web interface or command line".to_string(),
            ),
            Finding::IpNotAllowed { ip, fix } => (
                format!("Your IP '{ip}' is not in the allowed list"),
                format!("Fix: {fix}"),
            ),
        }
    }
}
