//! # Quadlet Gen
//!
//! Translates container definitions written for Docker, either a Compose
//! service manifest or a `docker run` invocation, into systemd Quadlet
//! `.container` units that `systemd-podman-generator` turns into native
//! services.
//!
//! ## Architecture Overview
//!
//! The pipeline is pure and synchronous:
//!
//! ```text
//! docker run ... ──[run]──▶ Compose document ──[compose]──▶ Container(s)
//!                                                               │
//!                        unit text ◀──[quadlet]── side-tables ◀─┘ [orchestrator]
//! ```
//!
//! - **[`container`]**: the typed container model with inline field validation
//! - **[`compose`]**: Compose document validation and shape normalization
//! - **[`quadlet`]**: deterministic unit-file rendering and value escaping
//! - **[`run`]**: run-command tokenizing and conversion to a Compose document
//! - **[`orchestrator`]**: the façade tying the stages together
//!
//! ## Quick Start
//!
//! ```rust
//! use quadlet_gen::{GenerateOptions, QuadletGenerator};
//!
//! let generator = QuadletGenerator::new();
//! let unit = generator.from_run_command(
//!     "docker run -d --name web -p 8080:80 nginx",
//!     &GenerateOptions::default(),
//! )?;
//!
//! assert_eq!(unit.filename, "web.container");
//! assert_eq!(
//!     unit.content,
//!     "[Container]\nImage=nginx\nContainerName=web\nPublishPort=8080:80\n"
//! );
//! # Ok::<(), quadlet_gen::ConvertError>(())
//! ```

/// Canonical container model.
///
/// Holds every setting a Quadlet `[Container]` section can express and
/// validates the fields with externally documented syntax as they are set.
pub mod container;

/// Compose document mapping.
///
/// Validates the document shape and maps each service into a container,
/// normalizing Compose's polymorphic field spellings.
pub mod compose;

/// Quadlet serializer.
///
/// Renders a container plus optional `[Unit]`, `[GlobalArgs]`, `[Service]`
/// and `[Install]` side-tables as unit-file text.
pub mod quadlet;

/// Run-command conversion.
///
/// Splits `docker run` strings and converts them into Compose documents.
pub mod run;

/// High-level conversion façade.
///
/// Derives systemd ordering and restart settings from Compose-only concepts
/// and assembles one unit per service.
pub mod orchestrator;

/// Environment constants and path utilities.
pub mod env;

// CLI module for command-line interface
pub mod cli;

pub use compose::{ComposeError, ComposeMapper, ComposeProject, Diagnostic};
pub use container::{Container, ContainerError, Notify};
pub use orchestrator::{ConvertError, GenerateOptions, GeneratedUnit, Generation, QuadletGenerator};
pub use quadlet::{Sections, generate};
pub use run::{DockerRunConverter, RunConverter, RunError};
