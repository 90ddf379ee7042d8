//! Run-command front door.
//!
//! A `docker run` invocation is turned into a Compose-shaped document by a
//! [`RunConverter`], after which it follows exactly the same mapping and
//! serialization path as a Compose file. [`DockerRunConverter`] is the
//! built-in implementation; callers with their own converter implement the
//! trait instead.

mod docker;
mod tokenize;

pub use docker::DockerRunConverter;
pub use tokenize::tokenize;

use serde_yaml::Value;

/// Run-command conversion errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    /// Command string could not be split into arguments
    #[error("Could not tokenize command: {0}")]
    Tokenize(String),

    /// Input is not a `run` invocation
    #[error("Not a run command: {0}")]
    NotARunCommand(String),

    /// No image argument was found
    #[error("Run command does not name an image")]
    MissingImage,

    /// Option given without its required value
    #[error("Option '{flag}' requires a value")]
    MissingValue { flag: String },

    /// Option value has the wrong form
    #[error("Invalid value '{value}' for option '{flag}': {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
    },
}

/// Result type for run-command conversion.
pub type Result<T> = std::result::Result<T, RunError>;

/// Converts a tokenized run invocation into a Compose document.
///
/// The returned value must be a mapping with a `services` mapping holding
/// exactly one service.
pub trait RunConverter {
    fn convert(&self, args: &[String]) -> Result<Value>;
}
