// ABOUTME: Runs the parse-and-validate pass for every configured device and assembles the report
// ABOUTME: Devices are checked in parallel; each one owns its inputs and its slot in the result

use crate::config::{Config, DeviceConfig};
use crate::hsrp::{DeviceResult, parse_standby_brief, validate};
use crate::ssh::CommandSource;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::thread;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum DeviceReport {
    Validated(DeviceResult),
    Unreachable { status: &'static str, error: String },
}

impl DeviceReport {
    fn unreachable(error: String) -> Self {
        DeviceReport::Unreachable {
            status: "unreachable",
            error,
        }
    }

    pub fn passed(&self) -> bool {
        match self {
            DeviceReport::Validated(result) => result.all_passed(),
            DeviceReport::Unreachable { .. } => false,
        }
    }
}

/// Device name -> outcome for one run.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct FinalReport {
    pub devices: BTreeMap<String, DeviceReport>,
}

impl FinalReport {
    pub fn passed(&self) -> bool {
        self.devices.values().all(DeviceReport::passed)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.context("Failed to serialize report")
    }
}

/// Fetch, parse and validate one device. Transport errors come back as
/// `Err`; the parse and validate steps cannot fail.
pub fn check_device(device: &DeviceConfig, source: &dyn CommandSource) -> Result<DeviceResult> {
    let output = source.fetch(device)?;
    let observed = parse_standby_brief(&output);
    tracing::debug!("{} reported {} HSRP group(s)", device.name, observed.len());
    Ok(validate(&observed, &device.expectations, &device.name))
}

pub fn run_checks(config: &Config, source: &dyn CommandSource) -> FinalReport {
    let outcomes: Vec<(String, Result<DeviceResult>)> = thread::scope(|scope| {
        let handles: Vec<_> = config
            .devices
            .iter()
            .map(|device| {
                let handle = scope.spawn(move || check_device(device, source));
                (device.name.clone(), handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(name, handle)| {
                let outcome = handle
                    .join()
                    .unwrap_or_else(|_| Err(anyhow::anyhow!("check for {name} panicked")));
                (name, outcome)
            })
            .collect()
    });

    let mut report = FinalReport::default();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                tracing::info!(
                    "{}: {} group(s) checked, {} failure(s)",
                    name,
                    result.len(),
                    result.failure_count()
                );
                report.devices.insert(name, DeviceReport::Validated(result));
            }
            Err(e) => {
                tracing::warn!("{}: no status output obtained: {:#}", name, e);
                if config.report.include_unreachable {
                    report.devices.insert(name, DeviceReport::unreachable(format!("{e:#}")));
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReportConfig, SshConfig};
    use crate::hsrp::ExpectationSpec;
    use anyhow::anyhow;
    use std::collections::HashMap;

    struct FakeSource {
        outputs: HashMap<String, String>,
    }

    impl FakeSource {
        fn new(outputs: &[(&str, &str)]) -> Self {
            Self {
                outputs: outputs
                    .iter()
                    .map(|(name, text)| (name.to_string(), text.to_string()))
                    .collect(),
            }
        }
    }

    impl CommandSource for FakeSource {
        fn fetch(&self, device: &DeviceConfig) -> Result<String> {
            self.outputs
                .get(&device.name)
                .cloned()
                .ok_or_else(|| anyhow!("connection refused"))
        }
    }

    const CPE1_OUTPUT: &str = "
Interface   Grp  Pri P State   Active          Standby         Virtual IP
Gi0/1       1    110   Active  local           10.0.0.2        10.0.0.254
Gi0/1       2    90    Standby 10.0.0.2        local           10.0.0.253";

    const CPE2_OUTPUT: &str = "
Gi0/1       1    100   Standby 10.0.0.1        local           10.0.0.254
Gi0/1       2    110   Active  local           10.0.0.1        10.0.0.253";

    fn device(name: &str) -> DeviceConfig {
        DeviceConfig {
            name: name.to_string(),
            host: Some(format!("{}.lab", name.to_lowercase())),
            username: None,
            port: None,
            identity_file: None,
            capture_file: None,
            expectations: vec![ExpectationSpec::active("1"), ExpectationSpec::standby("2")],
        }
    }

    fn config(names: &[&str], include_unreachable: bool) -> Config {
        Config {
            ssh: SshConfig::default(),
            report: ReportConfig {
                pretty: false,
                include_unreachable,
            },
            devices: names.iter().map(|name| device(name)).collect(),
        }
    }

    #[test]
    fn test_run_checks_all_devices() {
        let source = FakeSource::new(&[("CPE1", CPE1_OUTPUT), ("CPE2", CPE2_OUTPUT)]);
        let report = run_checks(&config(&["CPE1", "CPE2"], true), &source);

        assert!(!report.passed());
        assert!(report.devices["CPE1"].passed());
        assert!(!report.devices["CPE2"].passed());
        assert_eq!(
            report.to_json(false).unwrap(),
            concat!(
                r#"{"CPE1":{"grp1":{"Active":"pass"},"grp2":{"Standby":"pass"}},"#,
                r#""CPE2":{"grp1":{"Active":"Failed : CPE2 No longer Active"},"#,
                r#""grp2":{"Standby":"Failed : CPE2 No longer Standby"}}}"#
            )
        );
    }

    #[test]
    fn test_unreachable_device_reported() {
        let source = FakeSource::new(&[("CPE1", CPE1_OUTPUT)]);
        let report = run_checks(&config(&["CPE1", "CPE2"], true), &source);

        assert!(!report.passed());
        assert_eq!(
            report.devices["CPE2"],
            DeviceReport::Unreachable {
                status: "unreachable",
                error: "connection refused".to_string(),
            }
        );
        let json: serde_json::Value = serde_json::from_str(&report.to_json(true).unwrap()).unwrap();
        assert_eq!(json["CPE2"]["status"], "unreachable");
    }

    #[test]
    fn test_unreachable_device_omitted() {
        let source = FakeSource::new(&[("CPE1", CPE1_OUTPUT)]);
        let report = run_checks(&config(&["CPE1", "CPE2"], false), &source);

        assert_eq!(report.devices.len(), 1);
        assert!(report.passed());
    }

    #[test]
    fn test_check_device_propagates_transport_error() {
        let source = FakeSource::new(&[]);
        let result = check_device(&device("CPE1"), &source);

        assert!(result.is_err());
    }

    #[test]
    fn test_empty_report_passes() {
        let report = FinalReport::default();
        assert!(report.passed());
        assert_eq!(report.to_json(false).unwrap(), "{}");
    }
}
