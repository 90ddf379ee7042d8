//! CLI-specific functionality for quadlet-gen
//!
//! This module contains argument parsing, configuration discovery and
//! output handling for the `quadlet-gen` binary.

pub mod args;
pub mod config;
pub mod output;

pub use args::{Args, ComposeConfig, ExecutionMode, OutputConfig, OutputFormat, RunConfig};
pub use config::ConfigDiscovery;
