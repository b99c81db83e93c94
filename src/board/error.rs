//! Error types for board operations.

use thiserror::Error;

/// Errors raised by the board store.
///
/// Ignored drops and cancelled confirmations are outcomes, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// No lead with this id is on the board.
    #[error("Lead {0} not found")]
    LeadNotFound(i64),

    /// The requested stage is not part of the pipeline.
    #[error("Unknown stage '{name}'{}", did_you_mean(.suggestion))]
    UnknownStage {
        name: String,
        suggestion: Option<String>,
    },

    /// Another transition is waiting for confirmation.
    #[error("A move of lead {0} is awaiting confirmation; confirm or cancel it first")]
    ConfirmationPending(i64),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{}'?", s),
        None => String::new(),
    }
}

/// Type alias for Result with BoardError.
pub type BoardResult<T> = Result<T, BoardError>;
