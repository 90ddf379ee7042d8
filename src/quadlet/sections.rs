//! systemd side-tables rendered around the `[Container]` section.
//!
//! These overlays hold unit-level concerns that do not belong to the container
//! itself. They double as the caller-facing generation options, so every field
//! is optional and deserializes from partial TOML.

use crate::container::has_line_break;
use serde::{Deserialize, Serialize};

/// `[Unit]` section: description and ordering/dependency edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub after: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub wants: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub before: Vec<String>,
}

impl UnitSection {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.after.is_empty()
            && self.wants.is_empty()
            && self.requires.is_empty()
            && self.before.is_empty()
    }
}

/// `[Service]` section: process supervision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart_sec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_start_sec: Option<String>,
}

impl ServiceSection {
    pub fn is_empty(&self) -> bool {
        self.restart.is_none() && self.restart_sec.is_none() && self.timeout_start_sec.is_none()
    }
}

/// `[Install]` section: enable-time wiring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallSection {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub wanted_by: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_by: Vec<String>,
}

impl InstallSection {
    pub fn is_empty(&self) -> bool {
        self.wanted_by.is_empty() && self.required_by.is_empty()
    }
}

/// `[GlobalArgs]` section: arguments passed to `podman` before the subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub podman_args: Option<String>,
}

impl GlobalArgs {
    pub fn is_empty(&self) -> bool {
        self.podman_args.as_deref().is_none_or(str::is_empty)
    }
}

/// All optional sections for one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    pub unit: Option<UnitSection>,
    pub service: Option<ServiceSection>,
    pub install: Option<InstallSection>,
    pub globals: Option<GlobalArgs>,
}

impl Sections {
    /// First key whose value contains a line break, if any.
    pub fn multiline_key(&self) -> Option<&'static str> {
        let mut values: Vec<(&'static str, &str)> = Vec::new();
        if let Some(unit) = &self.unit {
            values.extend(unit.description.as_deref().map(|v| ("Description", v)));
            values.extend(unit.after.iter().map(|v| ("After", v.as_str())));
            values.extend(unit.wants.iter().map(|v| ("Wants", v.as_str())));
            values.extend(unit.requires.iter().map(|v| ("Requires", v.as_str())));
            values.extend(unit.before.iter().map(|v| ("Before", v.as_str())));
        }
        if let Some(service) = &self.service {
            values.extend(service.restart.as_deref().map(|v| ("Restart", v)));
            values.extend(service.restart_sec.as_deref().map(|v| ("RestartSec", v)));
            values.extend(service.timeout_start_sec.as_deref().map(|v| ("TimeoutStartSec", v)));
        }
        if let Some(install) = &self.install {
            values.extend(install.wanted_by.iter().map(|v| ("WantedBy", v.as_str())));
            values.extend(install.required_by.iter().map(|v| ("RequiredBy", v.as_str())));
        }
        if let Some(globals) = &self.globals {
            values.extend(globals.podman_args.as_deref().map(|v| ("PodmanArgs", v)));
        }

        values
            .into_iter()
            .find(|(_, value)| has_line_break(value))
            .map(|(key, _)| key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiline_key() {
        let mut sections = Sections {
            unit: Some(UnitSection {
                description: Some("Web frontend".to_string()),
                ..Default::default()
            }),
            install: Some(InstallSection {
                wanted_by: vec!["default.target".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(sections.multiline_key(), None);

        sections.install = Some(InstallSection {
            wanted_by: vec!["default.target\n[Service]".to_string()],
            ..Default::default()
        });
        assert_eq!(sections.multiline_key(), Some("WantedBy"));

        sections.unit = Some(UnitSection {
            description: Some("Web\r\nExecStartPre=/bin/rm".to_string()),
            ..Default::default()
        });
        assert_eq!(sections.multiline_key(), Some("Description"));
    }
}
