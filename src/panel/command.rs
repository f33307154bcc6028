//! Reads the panel configuration by running `v-list-sys-config json`.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tokio::time;

use crate::config::PanelConfig;
use crate::panel::settings::{parse_settings, SystemSettings};
use crate::panel::{PanelError, SettingsSource};

/// One-shot invocation of the panel's configuration dump.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: PathBuf,
    sudo: Option<String>,
    timeout: Duration,
}

impl CommandSource {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            program: config.list_command(),
            sudo: config.use_sudo.then(|| config.sudo_path.clone()),
            timeout: config.command_timeout(),
        }
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    fn command(&self) -> Command {
        let mut cmd = match &self.sudo {
            Some(sudo) => {
                let mut cmd = Command::new(sudo);
                cmd.arg(&self.program);
                cmd
            }
            None => Command::new(&self.program),
        };
        cmd.arg("json")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self) -> Result<SystemSettings, PanelError> {
        if !self.program.exists() {
            return Err(PanelError::CommandMissing(self.program.clone()));
        }

        let started = Instant::now();
        let output = match time::timeout(self.timeout, self.command().output()).await {
            Ok(result) => result.map_err(|source| PanelError::Spawn {
                program: self.program.clone(),
                source,
            })?,
            Err(_) => return Err(PanelError::Timeout(self.timeout.as_secs())),
        };

        let lines = capture_lines(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!(stderr = %stderr.trim_end(), "Configuration dump wrote to stderr");
        }

        tracing::info!(
            program = %self.program.display(),
            sudo = self.sudo.is_some(),
            status = %output.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Configuration dump finished"
        );

        if !output.status.success() {
            return Err(PanelError::CommandFailed {
                code: output.status.code(),
                output: String::from_utf8_lossy(&lines.join(&b"\n"[..])).into_owned(),
            });
        }

        let settings = parse_settings(&lines.concat())?;
        tracing::debug!(keys = settings.len(), "Configuration parsed");
        Ok(settings)
    }
}

impl SettingsSource for CommandSource {
    fn load(&self) -> impl Future<Output = Result<SystemSettings, PanelError>> + Send {
        self.run()
    }
}

/// Split stdout into lines with trailing whitespace removed, the way the
/// panel's own line capture sees them. Bytes are kept as they are.
fn capture_lines(stdout: &[u8]) -> Vec<&[u8]> {
    let stdout = stdout.strip_suffix(b"\n").unwrap_or(stdout);
    if stdout.is_empty() {
        return Vec::new();
    }
    stdout
        .split(|&b| b == b'\n')
        .map(|line| {
            let end = line
                .iter()
                .rposition(|b| !b.is_ascii_whitespace() && *b != 0 && *b != 0x0b)
                .map_or(0, |i| i + 1);
            &line[..end]
        })
        .collect()
}
