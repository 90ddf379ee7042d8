//! Compose document mapper.
//!
//! Reads an already-decoded Compose document (a [`serde_yaml::Value`]),
//! validates its shape and produces one [`Container`] per service.
//!
//! - [`normalize`]: one normalization function per polymorphic Compose field
//! - [`ComposeMapper`]: document and service validation, field mapping
//!
//! ## Usage
//!
//! ```rust
//! use quadlet_gen::compose::ComposeMapper;
//!
//! let project = ComposeMapper::parse_str(
//!     "services:\n  web:\n    image: nginx\n    ports: [\"80:80\"]\n",
//! )?;
//! let web = project.get("web").unwrap();
//! assert_eq!(web.publish_ports(), ["80:80"]);
//! # Ok::<(), quadlet_gen::compose::ComposeError>(())
//! ```

mod mapper;
pub mod normalize;

pub use mapper::ComposeMapper;

use crate::container::{Container, ContainerError};
use serde::Serialize;
use std::fmt;

/// Compose mapping errors.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// Document is not a mapping or has no usable `services`
    #[error("Invalid compose document: {0}")]
    Structural(String),

    /// Service declares neither `image` nor `build`
    #[error("Service '{service}' must define either 'image' or 'build'")]
    MissingImage { service: String },

    /// Top-level feature that cannot be expressed as Quadlet containers
    #[error("Unsupported compose feature: top-level '{feature}' is not supported")]
    UnsupportedFeature { feature: String },

    /// Field value has a shape the field does not accept
    #[error("Service '{service}': field '{field}' {reason}")]
    InvalidShape {
        service: String,
        field: String,
        reason: String,
    },

    /// Field value failed container model validation
    #[error("Service '{service}': {source}")]
    InvalidField {
        service: String,
        #[source]
        source: ContainerError,
    },

    /// YAML text could not be decoded
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for compose mapping.
pub type Result<T> = std::result::Result<T, ComposeError>;

/// A non-fatal note about input that had no effect on the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Service the note applies to, `None` for document-level notes
    pub service: Option<String>,
    /// Compose key that triggered the note
    pub feature: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.service {
            Some(service) => write!(f, "service '{}': {}", service, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// One mapped service.
#[derive(Debug, Clone)]
pub struct MappedService {
    pub name: String,
    pub container: Container,
}

/// Mapper output: services in document order plus diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ComposeProject {
    pub services: Vec<MappedService>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ComposeProject {
    /// Container for a service name.
    pub fn get(&self, name: &str) -> Option<&Container> {
        self.services
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.container)
    }

    /// Service names in document order.
    pub fn names(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Diagnostics for a single service.
    pub fn diagnostics_for(&self, service: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.service.as_deref() == Some(service))
            .collect()
    }
}
