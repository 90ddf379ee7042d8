//! Quadlet unit-file serializer.
//!
//! Walks a validated [`Container`](crate::container::Container) plus optional
//! systemd side-tables and renders deterministic `.container` text.
//!
//! ## Usage
//!
//! ```rust
//! use quadlet_gen::container::Container;
//! use quadlet_gen::quadlet::{generate, Sections, InstallSection};
//!
//! let mut container = Container::new("nginx")?;
//! container.add_publish_port("80:80")?;
//!
//! let sections = Sections {
//!     install: Some(InstallSection {
//!         wanted_by: vec!["default.target".to_string()],
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//!
//! let text = generate(&container, &sections);
//! assert!(text.starts_with("[Container]\nImage=nginx\nPublishPort=80:80\n"));
//! assert!(text.ends_with("[Install]\nWantedBy=default.target\n"));
//! # Ok::<(), quadlet_gen::container::ContainerError>(())
//! ```

mod sections;
mod serializer;

pub use sections::{GlobalArgs, InstallSection, Sections, ServiceSection, UnitSection};
pub use serializer::{escape_value, generate};

/// File extension of generated container units.
pub const CONTAINER_UNIT_EXTENSION: &str = "container";

/// Unit file name for a service or container name.
pub fn unit_filename(name: &str) -> String {
    format!("{}.{}", name, CONTAINER_UNIT_EXTENSION)
}
