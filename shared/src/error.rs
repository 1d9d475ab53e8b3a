//! Engine error and warning types
//!
//! Errors interrupt the operation and must reach the caller. Warnings ride
//! along with a successful result so the operator can be told what was lost.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the pure order engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A required selection or value is missing or out of range
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    /// A numeric field could not be parsed
    #[error("Invalid number in {field}: {value:?}")]
    InvalidNumber { field: String, value: String },

    /// Order status cannot move from one state to the other
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },
}

impl EngineError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending field, when the error carries one
    pub fn field(&self) -> Option<&str> {
        match self {
            EngineError::Validation { field, .. } | EngineError::InvalidNumber { field, .. } => {
                Some(field)
            }
            _ => None,
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Non-fatal notice that a result was built from incomplete history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIncompleteWarning {
    /// The order had no item detail; generic pieces were fabricated
    SyntheticItems { order_id: uuid::Uuid, piece_count: u32 },
    /// Only a names-only summary was available for the piece
    SummaryOnly { piece_code: String },
    /// A unit price could not be recovered and was set to zero
    UnrecoveredPrice { piece_code: String, field: String },
}

impl std::fmt::Display for DataIncompleteWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataIncompleteWarning::SyntheticItems {
                order_id,
                piece_count,
            } => write!(
                f,
                "Order {} has no item detail; {} generic pieces were reconstructed",
                order_id, piece_count
            ),
            DataIncompleteWarning::SummaryOnly { piece_code } => {
                write!(f, "Piece {} was recovered from a summary record", piece_code)
            }
            DataIncompleteWarning::UnrecoveredPrice { piece_code, field } => write!(
                f,
                "Piece {}: {} could not be recovered and was set to 0.000",
                piece_code, field
            ),
        }
    }
}
