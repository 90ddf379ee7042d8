//! Conversion façade.
//!
//! Wires run commands and Compose documents through the mapper and the
//! serializer, translating Compose-only concepts (`depends_on`, `restart`)
//! into the `[Unit]` and `[Service]` side-tables on the way.
//!
//! - [`merge`]: field-level merge policy for the side-tables
//! - [`QuadletGenerator`]: the entry points
//!
//! ## Usage
//!
//! ```rust
//! use quadlet_gen::orchestrator::{GenerateOptions, QuadletGenerator};
//!
//! let generator = QuadletGenerator::new();
//! let output = generator.from_compose_str(
//!     "services:\n  web:\n    image: nginx\n    depends_on: [db]\n  db:\n    image: postgres\n",
//!     &GenerateOptions::default(),
//! )?;
//!
//! assert_eq!(output.units[0].filename, "web.container");
//! assert!(output.units[0].content.contains("After=db.service"));
//! # Ok::<(), quadlet_gen::orchestrator::ConvertError>(())
//! ```

mod generator;
pub mod merge;

pub use generator::QuadletGenerator;

use crate::compose::{ComposeError, Diagnostic};
use crate::container::ContainerError;
use crate::quadlet::{GlobalArgs, InstallSection, ServiceSection, UnitSection};
use crate::run::RunError;
use anyhow::{Context, Result as AnyResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conversion errors across the whole pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Compose document could not be mapped
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// Run command could not be converted
    #[error(transparent)]
    Run(#[from] RunError),

    /// Container failed validation or a generation option was invalid
    #[error("Container '{name}': {source}")]
    Container {
        name: String,
        #[source]
        source: ContainerError,
    },

    /// A generation option would span several unit-file lines
    #[error("Option {key} must be a single line")]
    InvalidOption { key: String },

    /// Run converter produced a document without exactly one service
    #[error("Run command produced {0} services, expected exactly one")]
    UnexpectedServiceCount(usize),
}

/// Result type for conversions.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Caller-supplied generation options. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Container and unit name override for single-unit output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install: Option<InstallSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub globals: Option<GlobalArgs>,
}

impl GenerateOptions {
    /// Layer `top` over `self`: lists are unioned, `top` scalars win.
    pub fn overlay(&self, top: &GenerateOptions) -> GenerateOptions {
        GenerateOptions {
            name: merge::merge_scalar(top.name.as_ref(), self.name.as_ref()),
            unit: merge::overlay_unit(self.unit.as_ref(), top.unit.as_ref()),
            service: merge::overlay_service(self.service.as_ref(), top.service.as_ref()),
            install: merge::overlay_install(self.install.as_ref(), top.install.as_ref()),
            globals: merge::overlay_globals(self.globals.as_ref(), top.globals.as_ref()),
        }
    }

    /// Load options from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> AnyResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Load options from a TOML string
    pub fn from_toml_str(content: &str) -> AnyResult<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Save options to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> AnyResult<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).context("Failed to write config file")
    }

    /// Convert options to a TOML string
    pub fn to_toml_string(&self) -> AnyResult<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }
}

/// One generated unit file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedUnit {
    /// `<name>.container`
    pub filename: String,
    /// Full unit text
    pub content: String,
}

/// Output of a Compose conversion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Generation {
    /// Units in document service order
    pub units: Vec<GeneratedUnit>,
    /// Non-fatal notes about ignored input
    pub diagnostics: Vec<Diagnostic>,
}
