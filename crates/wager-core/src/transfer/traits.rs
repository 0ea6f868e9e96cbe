//! Transfer provider trait definition.

use crate::identity::PlayerId;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the external transfer mechanism
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Insufficient external balance")]
    InsufficientBalance,

    #[error("Insufficient allowance for pull")]
    InsufficientAllowance,

    #[error("Transfer provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Trait for the value-transfer mechanism that moves the wagered asset
/// in and out of the engine's custody.
///
/// Implementations can be:
/// - MockTransferClient for testing and demos
/// - A real asset-transfer client for production
#[async_trait]
pub trait TransferProvider: Send + Sync {
    /// Pull `amount` from the player's external account into custody
    async fn pull_from(&self, id: PlayerId, amount: u64) -> Result<(), TransferError>;

    /// Push `amount` from custody out to the player's external account
    async fn push_to(&self, id: PlayerId, amount: u64) -> Result<(), TransferError>;
}
