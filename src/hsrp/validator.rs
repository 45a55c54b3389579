// ABOUTME: Reconciles observed HSRP group states against operator expectations
// ABOUTME: Produces one verdict record per expected group, merging active and standby checks

use super::types::{
    DeviceResult, ExpectationSpec, ObservedStates, STATE_ACTIVE, STATE_STANDBY, Verdict,
};

/// Check every expectation against the observed states of `device_name`.
///
/// A group missing from `observed` is treated as an unknown state, so any
/// expectation on it fails. Groups nobody asked about are not reported.
pub fn validate(
    observed: &ObservedStates,
    expectations: &[ExpectationSpec],
    device_name: &str,
) -> DeviceResult {
    let mut result = DeviceResult::default();

    for expectation in expectations {
        if !expectation.expect_active && !expectation.expect_standby {
            tracing::debug!(
                "Expectation for group {} on {} sets no flag, skipping",
                expectation.group,
                device_name
            );
            continue;
        }

        let actual = observed
            .get(&expectation.group)
            .map(String::as_str)
            .unwrap_or("");

        let verdict = result.groups.entry(expectation.verdict_key()).or_default();

        if expectation.expect_active {
            let active = check_role(actual, STATE_ACTIVE, device_name, "Active");
            verdict.active_result = Some(active);
        }
        if expectation.expect_standby {
            let standby = check_role(actual, STATE_STANDBY, device_name, "Standby");
            verdict.standby_result = Some(standby);
        }
    }

    result
}

fn check_role(actual: &str, wanted: &str, device_name: &str, role: &str) -> Verdict {
    if actual == wanted {
        Verdict::Pass
    } else {
        Verdict::Failed(format!("Failed : {device_name} No longer {role}"))
    }
}
