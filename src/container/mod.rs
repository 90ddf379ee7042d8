//! Container model.
//!
//! The typed intermediate representation that sits between the input formats
//! (Compose documents, run commands) and the Quadlet serializer.
//!
//! ## Usage
//!
//! ```rust
//! use quadlet_gen::container::Container;
//!
//! let mut container = Container::new("docker.io/library/nginx:1.25")?;
//! container.set_container_name("web")?;
//! container.add_publish_port("8080:80")?;
//! container.add_environment("NGINX_HOST=example.org")?;
//! container.validate()?;
//! assert_eq!(container.default_name(), "nginx");
//! # Ok::<(), quadlet_gen::container::ContainerError>(())
//! ```

mod model;
mod types;

pub use model::{Container, default_name_for_image, has_line_break};
pub use types::{AutoUpdate, Notify, PullPolicy};

/// Field validation errors raised while building a [`Container`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    /// Image reference is empty or malformed
    #[error("Invalid image reference '{0}'")]
    InvalidImage(String),

    /// Container name does not match `^[A-Za-z0-9][A-Za-z0-9_.-]*$`
    #[error("Invalid container name '{0}': must start with an alphanumeric character and contain only [A-Za-z0-9_.-]")]
    InvalidName(String),

    /// Published port is not `[ip:[host]:|host:]container[/tcp|udp|sctp]` with ports in 1-65535
    #[error("Invalid port '{0}': expected [ip:[host]:|host:]container[/tcp|udp|sctp] with ports in 1-65535")]
    InvalidPort(String),

    /// Environment entry without `=`
    #[error("Invalid environment entry '{0}': expected KEY=VALUE")]
    InvalidEnvironment(String),

    /// Label without `=`
    #[error("Invalid label '{0}': expected KEY=VALUE")]
    InvalidLabel(String),

    /// Volume is neither an absolute path nor `source:destination[:options]`
    #[error("Invalid volume '{volume}': {reason}")]
    InvalidVolume { volume: String, reason: String },

    /// A value would span several unit-file lines
    #[error("Value for {key} must be a single line: {value:?}")]
    LineBreak { key: String, value: String },
}

/// Result type for container model operations.
pub type Result<T> = std::result::Result<T, ContainerError>;
