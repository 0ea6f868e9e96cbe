//! Wager Core Library
//!
//! Shared primitives for the wagering engine:
//! - Identity (PlayerId)
//! - Commit-reveal primitives (Commitment, Nonce)
//! - TransferProvider trait and MockTransferClient

pub mod crypto;
pub mod identity;
pub mod transfer;

pub use crypto::{Commitment, Nonce};
pub use identity::PlayerId;
pub use transfer::{MockTransferClient, TransferError, TransferProvider};
