//! Compute error types

use thiserror::Error;

/// Errors raised while building template options
#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Type mismatch: expected {expected} options, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ComputeError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ComputeError>;
