// ABOUTME: hsrp-check library: parses HSRP status output and validates it against expectations
// ABOUTME: The hsrp module is the pure core; ssh, config and report wrap it for real devices

pub mod cli;
pub mod config;
pub mod hsrp;
pub mod report;
pub mod ssh;

pub use cli::{Cli, Outcome, run};
