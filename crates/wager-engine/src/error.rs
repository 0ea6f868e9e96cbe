//! Engine error taxonomy.
//!
//! Every error aborts the triggering operation with no partial effect; the
//! engine never retries on its own.

use thiserror::Error;
use wager_core::TransferError;

/// Errors from engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Amount must be positive")]
    ZeroValue,

    #[error("Account has no credit")]
    ZeroBalance,

    #[error("Amount exceeds available credit")]
    AmountExceedsBalance,

    #[error("Caller already has an open match")]
    UserAlreadyHosting,

    #[error("Operation not permitted in the current phase")]
    InvalidPhase,

    #[error("Reveal does not match the stored commitment")]
    InvalidReveal,

    #[error("Deadline has not been reached")]
    DeadlineNotReached,

    #[error("Caller is not a participant in this match")]
    NotAParticipant,

    #[error("Caller has already revealed")]
    AlreadyRevealed,

    #[error("External transfer failed: {0}")]
    TransferFailed(#[from] TransferError),
}
