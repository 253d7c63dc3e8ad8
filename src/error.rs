use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CalcError>;

/// Failures surfaced by the calculator core.
///
/// Every variant is returned to the immediate caller; nothing in the core
/// retries or recovers. The command interpreter turns them into text.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("invalid operand: '{value}' is not a number")]
    InvalidOperand { value: String },

    #[error("cannot divide by zero")]
    DivisionByZero,

    #[error("unknown operation: '{name}'")]
    UnknownOperation { name: String },

    #[error("malformed command: '{input}'")]
    MalformedCommand { input: String },

    #[error("history file {path}: {message}")]
    Persistence { path: PathBuf, message: String },

    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalcError {
    #[must_use]
    pub fn invalid_operand(value: impl ToString) -> Self {
        Self::InvalidOperand {
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    #[must_use]
    pub fn persistence(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for failures of the durable history store.
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. } | Self::Io(_))
    }
}
