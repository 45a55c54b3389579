// ABOUTME: HSRP parse-and-validate core: status output parsing and expectation checks
// ABOUTME: Pure, synchronous, and infallible apart from reading capture files

pub mod parser;
pub mod types;
pub mod validator;

pub use parser::{parse_line, parse_standby_brief, parse_standby_brief_file};
pub use types::{DeviceResult, ExpectationSpec, GroupVerdict, ObservedStates, Verdict};
pub use validator::validate;
