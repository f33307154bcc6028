//! The diagnosis: one linear pass from request context to findings.
//!
//! # Data Flow
//! ```text
//! RequestContext
//!     → helper module present?           (fatal if not, before resolution)
//!     → request::resolve                 (detected IP)
//!     → SettingsSource::load             (fatal on any read failure)
//!     → security::evaluate               (allow-list verdict)
//!     → findings::collect                (troubleshooting predicates)
//!     → Diagnosis (facts only; report/ formats them)
//! ```

use std::path::PathBuf;

use thiserror::Error;

pub mod findings;

pub use findings::Finding;

use crate::config::PanelConfig;
use crate::panel::{PanelError, SettingsSource, SystemSettings, API_ALLOWED_IP};
use crate::request::{resolve, RequestContext, ResolvedIp};
use crate::security::{evaluate, Verdict};

/// Fatal conditions that end a diagnosis early.
#[derive(Debug, Error)]
pub enum DiagnoseError {
    #[error("HestiaCP helpers not found at {}", .0.display())]
    HelpersMissing(PathBuf),

    #[error(transparent)]
    Panel(#[from] PanelError),
}

/// Every fact the report needs, computed once.
#[derive(Debug, Clone)]
pub struct Diagnosis {
    pub context: RequestContext,
    pub detected: ResolvedIp,
    pub settings: SystemSettings,
    /// Raw `API_ALLOWED_IP`, empty when not set.
    pub allowed_setting: String,
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
}

/// Runs diagnoses against one panel install.
#[derive(Debug, Clone)]
pub struct Doctor<S> {
    panel: PanelConfig,
    source: S,
}

impl<S: SettingsSource> Doctor<S> {
    pub fn new(panel: PanelConfig, source: S) -> Self {
        Self { panel, source }
    }

    pub fn panel(&self) -> &PanelConfig {
        &self.panel
    }

    pub async fn diagnose(&self, context: RequestContext) -> Result<Diagnosis, DiagnoseError> {
        let helpers = self.panel.helpers_path();
        if !helpers.exists() {
            tracing::error!(path = %helpers.display(), "Panel helper module missing");
            return Err(DiagnoseError::HelpersMissing(helpers.to_path_buf()));
        }

        let detected = resolve(&context);
        tracing::info!(
            detected = %detected.text(),
            source = ?detected.source,
            "Client IP resolved"
        );

        let settings = self.source.load().await?;

        let allowed_setting = settings.get(API_ALLOWED_IP).unwrap_or("").to_string();
        let verdict = evaluate(detected.as_bytes(), &allowed_setting);
        let findings = findings::collect(&settings, detected.as_bytes(), &self.panel.change_command());

        tracing::info!(
            allowed = verdict.is_allowed(),
            findings = findings.len(),
            "Diagnosis complete"
        );

        Ok(Diagnosis {
            context,
            detected,
            settings,
            allowed_setting,
            verdict,
            findings,
        })
    }
}
