//! Enumerated container settings with a fixed set of Quadlet values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the container reports readiness to systemd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notify {
    /// conmon signals readiness once the container process started (Quadlet default).
    #[default]
    Conmon,
    /// The containerized application sends `sd_notify` itself.
    Container,
    /// Readiness is signalled when the health check first passes.
    Healthy,
}

impl Notify {
    /// Value for the `Notify=` key, `None` for the default mode.
    pub fn quadlet_value(&self) -> Option<&'static str> {
        match self {
            Notify::Conmon => None,
            Notify::Container => Some("true"),
            Notify::Healthy => Some("healthy"),
        }
    }
}

/// Image pull policy (`Pull=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullPolicy {
    Always,
    Missing,
    Never,
    Newer,
}

impl PullPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PullPolicy::Always => "always",
            PullPolicy::Missing => "missing",
            PullPolicy::Never => "never",
            PullPolicy::Newer => "newer",
        }
    }
}

impl FromStr for PullPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(PullPolicy::Always),
            "missing" => Ok(PullPolicy::Missing),
            "never" => Ok(PullPolicy::Never),
            "newer" => Ok(PullPolicy::Newer),
            other => Err(format!("unknown pull policy '{}'", other)),
        }
    }
}

impl fmt::Display for PullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// podman-auto-update policy (`AutoUpdate=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoUpdate {
    Registry,
    Local,
}

impl AutoUpdate {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoUpdate::Registry => "registry",
            AutoUpdate::Local => "local",
        }
    }
}

impl FromStr for AutoUpdate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registry" => Ok(AutoUpdate::Registry),
            "local" => Ok(AutoUpdate::Local),
            other => Err(format!("unknown auto-update policy '{}'", other)),
        }
    }
}
