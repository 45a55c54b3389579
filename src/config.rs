// ABOUTME: Configuration structures and parsing for devices, SSH transport, and report output
// ABOUTME: Keeps device lists and HSRP expectations out of the code so the core only sees data

use crate::hsrp::ExpectationSpec;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub ssh: SshConfig,
    #[serde(default)]
    pub report: ReportConfig,
    pub devices: Vec<DeviceConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SshConfig {
    #[serde(default = "default_ssh_binary")]
    pub ssh_binary: String,
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ReportConfig {
    #[serde(default = "default_true")]
    pub pretty: bool,
    /// Emit an "unreachable" entry for devices whose output could not be
    /// fetched instead of leaving them out of the report.
    #[serde(default = "default_true")]
    pub include_unreachable: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    pub name: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub identity_file: Option<String>,
    /// Previously captured command output, used instead of a live session.
    #[serde(default)]
    pub capture_file: Option<String>,
    #[serde(default)]
    pub expectations: Vec<ExpectationSpec>,
}

fn default_ssh_binary() -> String {
    "/usr/bin/ssh".to_string()
}

fn default_command() -> String {
    "show standby brief".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for SshConfig {
    fn default() -> Self {
        SshConfig {
            ssh_binary: default_ssh_binary(),
            command: default_command(),
            connect_timeout_secs: default_connect_timeout_secs(),
            extra_args: Vec::new(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            pretty: true,
            include_unreachable: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let device = |name: &str, host: &str| DeviceConfig {
            name: name.to_string(),
            host: Some(host.to_string()),
            username: Some("netops".to_string()),
            port: None,
            identity_file: None,
            capture_file: None,
            expectations: vec![ExpectationSpec::active("1"), ExpectationSpec::standby("2")],
        };

        Config {
            ssh: SshConfig::default(),
            report: ReportConfig::default(),
            devices: vec![device("CPE1", "cpe1.example.net"), device("CPE2", "cpe2.example.net")],
        }
    }
}

impl Config {
    pub fn default_config_content() -> &'static str {
        r#"# hsrp-check configuration

[ssh]
# Authentication is left to the ssh client (agent, keys, ~/.ssh/config).
ssh_binary = "/usr/bin/ssh"
command = "show standby brief"
connect_timeout_secs = 10
extra_args = []

[report]
pretty = true
# Report devices whose output could not be fetched as "unreachable"
# instead of leaving them out.
include_unreachable = true

[[devices]]
name = "CPE1"
host = "cpe1.example.net"
username = "netops"
# port = 22
# identity_file = "~/.ssh/id_ed25519"
# capture_file = "~/captures/cpe1.txt"

[[devices.expectations]]
group = "1"
expect_active = true

[[devices.expectations]]
group = "2"
expect_standby = true

[[devices]]
name = "CPE2"
host = "cpe2.example.net"
username = "netops"

[[devices.expectations]]
group = "1"
expect_active = true

[[devices.expectations]]
group = "2"
expect_standby = true
"#
    }

    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::load_from_str(&content)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(config_dir.join("hsrp-check").join("config.toml"))
    }

    pub fn expand_path(&mut self) -> Result<()> {
        for device in &mut self.devices {
            if let Some(path) = &device.identity_file {
                device.identity_file = Some(expand_tilde(path)?);
            }
            if let Some(path) = &device.capture_file {
                device.capture_file = Some(expand_tilde(path)?);
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.ssh.ssh_binary.is_empty() {
            anyhow::bail!("SSH binary cannot be empty");
        }

        if self.ssh.command.trim().is_empty() {
            anyhow::bail!("Status command cannot be empty");
        }

        if self.ssh.connect_timeout_secs == 0 {
            anyhow::bail!("connect_timeout_secs must be greater than 0");
        }

        if self.devices.is_empty() {
            anyhow::bail!("At least one device must be configured");
        }

        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.name.trim().is_empty() {
                anyhow::bail!("Device name cannot be empty");
            }
            if !seen.insert(device.name.as_str()) {
                anyhow::bail!("Duplicate device name: {}", device.name);
            }
            if device.host.is_none() && device.capture_file.is_none() {
                anyhow::bail!("Device {} needs either a host or a capture_file", device.name);
            }
            for expectation in &device.expectations {
                if !expectation.expect_active && !expectation.expect_standby {
                    anyhow::bail!(
                        "Expectation for group {} on {} must set expect_active or expect_standby",
                        expectation.group,
                        device.name
                    );
                }
            }
            if device.expectations.is_empty() {
                tracing::warn!(
                    "Device {} has no expectations; its result will be empty",
                    device.name
                );
            }
        }

        Ok(())
    }

    pub fn save_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config to: {}", path.display()))?;

        Ok(())
    }
}

fn expand_tilde(path: &str) -> Result<String> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(rest).to_string_lossy().into_owned())
    } else {
        Ok(path.to_string())
    }
}
