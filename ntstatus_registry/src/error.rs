//! Registry error types

use crate::logging::codes;
use crate::logging::Code;

/// Errors surfaced by the registry and its input conversions.
///
/// A value with no catalog entry is not an error: lookups return an empty
/// list for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid status value '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("Status value {value} is outside the 32-bit NTSTATUS range (0..=0xFFFFFFFF)")]
    OutOfRange { value: String },

    #[error("Duplicate name '{name}' at entries {first} and {second}")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },
}

impl RegistryError {
    pub fn invalid_input(input: &str, reason: &str) -> Self {
        Self::InvalidInput {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn out_of_range(value: impl ToString) -> Self {
        Self::OutOfRange {
            value: value.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            RegistryError::InvalidInput { .. } => codes::input::INVALID_INPUT,
            RegistryError::OutOfRange { .. } => codes::input::OUT_OF_RANGE,
            RegistryError::DuplicateName { .. } => codes::catalog::DUPLICATE_NAME,
        }
    }
}
