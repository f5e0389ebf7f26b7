//! Error types surfaced to the operator

use thiserror::Error;

/// Every failure that halts a setup run
#[derive(Debug, Error)]
pub enum SetupError {
    /// A required choice was left at its "Select one" value
    #[error("{0}")]
    Selection(String),

    /// A text field failed its format check
    #[error("{message} ({field})")]
    Validation { field: &'static str, message: String },

    /// The administration CLI reported an error on stderr or stdout
    #[error("{0}")]
    Command(String),

    /// A session value could not be found in the environment
    #[error("Could not resolve {name}: set {env_var} or pass --{flag}")]
    ContextResolution {
        name: &'static str,
        env_var: &'static str,
        flag: &'static str,
    },

    /// The CLI succeeded but its output was not the JSON we expected
    #[error("Unexpected response from {subcommand}: {reason}\n{output}")]
    Response {
        subcommand: &'static str,
        reason: String,
        output: String,
    },
}

impl SetupError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        SetupError::Validation {
            field,
            message: message.into(),
        }
    }
}
