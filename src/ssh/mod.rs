// ABOUTME: Transport module for obtaining raw HSRP status output from devices
// ABOUTME: Wraps the system ssh client and captured-output files behind one trait

pub mod runner;

pub use runner::{CaptureFileSource, CommandSource, DeviceSource, SshRunner};
