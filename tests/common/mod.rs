//! Shared fixtures: a throwaway panel install on disk.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use panel_ip_debug::config::PanelConfig;
use tempfile::TempDir;

/// Fake panel tree with a helper module and a scripted `v-list-sys-config`.
///
/// The dump command is run as `/bin/sh <script> json` (sh stands in for
/// sudo), so the script never has to be executable.
pub struct FakePanel {
    dir: TempDir,
}

impl FakePanel {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let panel = Self { dir };
        fs::create_dir_all(panel.helpers_path().parent().unwrap()).unwrap();
        fs::write(panel.helpers_path(), "<?php\nfunction get_real_user_ip() {}\n").unwrap();
        fs::create_dir_all(panel.bin_dir()).unwrap();
        panel
    }

    pub fn helpers_path(&self) -> PathBuf {
        self.dir.path().join("web/inc/helpers.php")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.dir.path().join("bin")
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn remove_helpers(&self) {
        fs::remove_file(self.helpers_path()).unwrap();
    }

    /// Install a dump command whose body is the given shell snippet.
    pub fn list_command(&self, body: &str) {
        let script = format!("[ \"$1\" = json ] || exit 64\n{body}\n");
        fs::write(self.bin_dir().join("v-list-sys-config"), script).unwrap();
    }

    /// Install a dump command that prints `json` and exits 0.
    pub fn list_command_json(&self, json: &str) {
        self.list_command(&format!("cat <<'EOF'\n{json}\nEOF"));
    }

    pub fn panel_config(&self) -> PanelConfig {
        PanelConfig {
            helpers_path: self.helpers_path(),
            bin_dir: self.bin_dir(),
            use_sudo: true,
            sudo_path: "/bin/sh".to_string(),
            command_timeout_secs: 5,
        }
    }

    /// Write a config file pointing at this tree, lookups disabled.
    pub fn config_file(&self) -> PathBuf {
        let path = self.dir.path().join("panel-ip-debug.toml");
        let content = format!(
            r#"
[panel]
helpers_path = "{}"
bin_dir = "{}"
use_sudo = true
sudo_path = "/bin/sh"
command_timeout_secs = 5

[lookup]
enabled = false
fallback_address = "127.0.0.1"
"#,
            self.helpers_path().display(),
            self.bin_dir().display()
        );
        fs::write(&path, content).unwrap();
        path
    }
}

pub const HEALTHY_JSON: &str =
    r#"{"config":{"API":"yes","API_SYSTEM":"1","API_ALLOWED_IP":"203.0.113.5,198.51.100.1","VERSION":"1.8.12"}}"#;
