// ABOUTME: Value types shared by the HSRP status parser and the state validator
// ABOUTME: Observed group states, operator expectations, and per-group verdicts

use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Group identifier -> lowercase state token, as reported by one device.
pub type ObservedStates = HashMap<String, String>;

pub const STATE_ACTIVE: &str = "active";
pub const STATE_STANDBY: &str = "standby";

/// One operator assertion about a group on a device.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExpectationSpec {
    pub group: String,
    #[serde(default)]
    pub expect_active: bool,
    #[serde(default)]
    pub expect_standby: bool,
}

impl ExpectationSpec {
    pub fn active(group: &str) -> Self {
        Self {
            group: group.to_string(),
            expect_active: true,
            expect_standby: false,
        }
    }

    pub fn standby(group: &str) -> Self {
        Self {
            group: group.to_string(),
            expect_active: false,
            expect_standby: true,
        }
    }

    /// Key under which this expectation's verdict is reported.
    pub fn verdict_key(&self) -> String {
        format!("grp{}", self.group)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Failed(String),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("pass"),
            Verdict::Failed(message) => f.write_str(message),
        }
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Serialized with the `Active` / `Standby` keys that existing consumers of
/// the JSON report already read, rather than the Rust field names.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct GroupVerdict {
    #[serde(rename = "Active", skip_serializing_if = "Option::is_none")]
    pub active_result: Option<Verdict>,
    #[serde(rename = "Standby", skip_serializing_if = "Option::is_none")]
    pub standby_result: Option<Verdict>,
}

impl GroupVerdict {
    pub fn passed(&self) -> bool {
        self.results().all(Verdict::is_pass)
    }

    pub fn failure_count(&self) -> usize {
        self.results().filter(|v| !v.is_pass()).count()
    }

    fn results(&self) -> impl Iterator<Item = &Verdict> {
        self.active_result.iter().chain(self.standby_result.iter())
    }
}

/// Verdict key (e.g. "grp1") -> verdict, for one device.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct DeviceResult {
    pub groups: BTreeMap<String, GroupVerdict>,
}

impl DeviceResult {
    pub fn get(&self, key: &str) -> Option<&GroupVerdict> {
        self.groups.get(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn all_passed(&self) -> bool {
        self.groups.values().all(GroupVerdict::passed)
    }

    pub fn failure_count(&self) -> usize {
        self.groups.values().map(GroupVerdict::failure_count).sum()
    }
}
