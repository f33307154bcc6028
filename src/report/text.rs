//! Plain-text rendering.

use std::fmt::Write;

use crate::diagnose::{DiagnoseError, Diagnosis};
use crate::lookup::LookupReport;
use crate::panel::{PanelError, API, API_ALLOWED_IP, API_SYSTEM, NOT_SET};
use crate::request::SourceField;
use crate::security::{hex_dump, truthy, AddressFamily, Verdict};

const UNAVAILABLE: &str = "unavailable";

/// How the request context was obtained.
#[derive(Debug, Clone, Copy)]
pub enum Mode<'a> {
    /// Real request served over HTTP.
    Web,
    /// Synthesized context; carries what the lookup found.
    Standalone(&'a LookupReport),
}

/// Banner printed ahead of everything else.
pub fn render_banner(mode: Mode<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== HestiaCP API IP Debug ===");
    let _ = writeln!(out, "Run this on your HestiaCP server, standalone or behind its web server");
    let _ = writeln!(out);

    if let Mode::Standalone(lookup) = mode {
        let _ = writeln!(out, "WARNING: Running standalone - simulating web environment");
        let _ = writeln!(out, "External IPv4: {}", lookup.ipv4.as_deref().unwrap_or(UNAVAILABLE));
        let _ = writeln!(out, "External IPv6: {}", lookup.ipv6.as_deref().unwrap_or(UNAVAILABLE));
        let _ = writeln!(out);
    }
    out
}

/// Full report for a completed diagnosis.
pub fn render_report(mode: Mode<'_>, diagnosis: &Diagnosis) -> String {
    let mut out = render_banner(mode);
    // Writing into a String cannot fail.
    let _ = write_body(&mut out, diagnosis);
    out
}

/// Banner plus the fatal error, as printed before exiting with status 1.
pub fn render_failure(mode: Mode<'_>, error: &DiagnoseError) -> String {
    let mut out = render_banner(mode);
    let _ = writeln!(out, "ERROR: {error}");
    match error {
        DiagnoseError::HelpersMissing(_) => {
            let _ = writeln!(out, "Please run this tool on your HestiaCP server");
        }
        DiagnoseError::Panel(PanelError::CommandFailed { output, .. }) => {
            let _ = writeln!(out, "Output: {output}");
        }
        DiagnoseError::Panel(_) => {}
    }
    out
}

fn write_body(out: &mut String, d: &Diagnosis) -> std::fmt::Result {
    writeln!(out, "=== Server Environment Variables ===")?;
    for field in SourceField::DISPLAY_ORDER {
        let value = d.context.text(field).unwrap_or(NOT_SET.into());
        writeln!(out, "{}: {value}", field.server_var())?;
    }

    writeln!(out)?;
    writeln!(out, "=== Detected IP ===")?;
    writeln!(out, "get_real_user_ip(): '{}'", d.detected.text())?;
    match d.detected.source {
        Some(source) => writeln!(out, "Source: {source}")?,
        None => writeln!(out, "Source: none (no input was set)")?,
    }

    writeln!(out)?;
    writeln!(out, "=== Current Configuration ===")?;
    for key in [API_ALLOWED_IP, API, API_SYSTEM] {
        writeln!(out, "{key}: {}", d.settings.get(key).unwrap_or(NOT_SET))?;
    }

    writeln!(out)?;
    writeln!(out, "=== IP Validation Test ===")?;
    let detected = d.detected.as_bytes();
    let shown = d.detected.text();
    match &d.verdict {
        Verdict::AllowAll => writeln!(out, "API allows all IPs")?,
        Verdict::Allowed(list) | Verdict::NotAllowed(list) => {
            writeln!(out, "Detected IP: '{shown}'")?;
            writeln!(out, "Allowed IPs: {list}")?;
            let answer = if d.verdict.is_allowed() { "YES" } else { "NO" };
            writeln!(out, "IP is allowed: {answer}")?;
            if detected.is_empty() {
                writeln!(out, "Note: an empty IP always matches the implicit '' entry")?;
            }

            if truthy(detected) {
                writeln!(out)?;
                writeln!(out, "Detected IP hex dump: {}", hex_dump(detected))?;
                writeln!(out, "Detected IP length: {}", detected.len())?;
                writeln!(out, "IP type: {}", AddressFamily::classify(detected))?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "=== Troubleshooting Suggestions ===")?;
    if d.findings.is_empty() {
        writeln!(out, "No problems detected")?;
    }
    for finding in &d.findings {
        let (headline, fix) = finding.lines();
        writeln!(out, "⚠️  {headline}")?;
        writeln!(out, "   {fix}")?;
    }

    writeln!(out)?;
    writeln!(out, "=== Next Steps ===")?;
    writeln!(out, "1. Copy this tool to your HestiaCP server")?;
    writeln!(out, "2. Run it standalone: panel-ip-debug check")?;
    writeln!(out, "3. Or serve it behind the panel's web server: panel-ip-debug serve")?;
    writeln!(out, "4. Apply the suggested fixes above")?;
    Ok(())
}
