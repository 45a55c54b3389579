// ABOUTME: Fetches raw "show standby brief" output from devices over the system ssh client
// ABOUTME: Also serves previously captured output files so offline checks use the same path

use crate::config::{DeviceConfig, SshConfig};
use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Source of raw status output for a device.
pub trait CommandSource: Sync {
    fn fetch(&self, device: &DeviceConfig) -> Result<String>;
}

pub struct SshRunner {
    config: SshConfig,
}

impl SshRunner {
    pub fn new(config: SshConfig) -> Self {
        Self { config }
    }

    /// Build the ssh argument list. BatchMode stops ssh from prompting for
    /// a password, so a device without key access fails instead of hanging.
    fn build_args(&self, host: &str, device: &DeviceConfig) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.config.connect_timeout_secs),
        ];

        if let Some(port) = device.port {
            args.push("-p".to_string());
            args.push(port.to_string());
        }
        if let Some(identity) = &device.identity_file {
            args.push("-i".to_string());
            args.push(identity.clone());
        }
        if let Some(user) = &device.username {
            args.push("-l".to_string());
            args.push(user.clone());
        }

        args.extend(self.config.extra_args.iter().cloned());
        args.push(host.to_string());
        args.push(self.config.command.clone());
        args
    }

    fn resolve_binary(&self) -> Result<PathBuf> {
        let binary = Path::new(&self.config.ssh_binary);
        if binary.components().count() > 1 {
            return Ok(binary.to_path_buf());
        }
        which::which(binary)
            .with_context(|| format!("SSH binary not found in PATH: {}", self.config.ssh_binary))
    }
}

impl CommandSource for SshRunner {
    fn fetch(&self, device: &DeviceConfig) -> Result<String> {
        let host = device
            .host
            .as_deref()
            .ok_or_else(|| anyhow!("Device {} has no host configured", device.name))?;

        let binary = self.resolve_binary()?;
        let args = self.build_args(host, device);
        tracing::debug!("Running {} {:?} for device {}", binary.display(), args, device.name);

        let output = Command::new(&binary)
            .args(&args)
            .output()
            .with_context(|| {
                format!("Failed to run {} for device {}", binary.display(), device.name)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "ssh to {} exited with {}: {}",
                host,
                output.status,
                stderr.trim()
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            return Err(anyhow!("ssh to {} returned no output", host));
        }

        Ok(stdout)
    }
}

pub struct CaptureFileSource;

impl CommandSource for CaptureFileSource {
    fn fetch(&self, device: &DeviceConfig) -> Result<String> {
        let path = device
            .capture_file
            .as_deref()
            .ok_or_else(|| anyhow!("Device {} has no capture_file configured", device.name))?;

        tracing::debug!("Reading captured output for {} from {}", device.name, path);
        let content = fs::read_to_string(path).with_context(|| {
            format!("Failed to read capture file for {}: {}", device.name, path)
        })?;

        if content.trim().is_empty() {
            return Err(anyhow!("Capture file for {} is empty: {}", device.name, path));
        }

        Ok(content)
    }
}

/// Uses the capture file when a device has one, otherwise a live ssh session.
pub struct DeviceSource {
    ssh: SshRunner,
    capture: CaptureFileSource,
}

impl DeviceSource {
    pub fn new(config: SshConfig) -> Self {
        Self {
            ssh: SshRunner::new(config),
            capture: CaptureFileSource,
        }
    }
}

impl CommandSource for DeviceSource {
    fn fetch(&self, device: &DeviceConfig) -> Result<String> {
        if device.capture_file.is_some() {
            self.capture.fetch(device)
        } else {
            self.ssh.fetch(device)
        }
    }
}
