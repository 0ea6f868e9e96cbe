//! Commitment and Nonce for the commit-reveal scheme.
//!
//! A commitment binds (move, nonce, committer). The committer identity is
//! part of the digest so a second player cannot copy an observed commitment
//! verbatim and force a guaranteed tie.

use crate::identity::PlayerId;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Secret nonce for the commitment scheme
#[derive(Clone, Serialize, Deserialize)]
pub struct Nonce([u8; 32]);

impl Nonce {
    /// Create a new random nonce
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({})", hex::encode(&self.0[..8]))
    }
}

/// Commitment = H(move || nonce || committer)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// Create a commitment from move bytes, nonce, and committer identity
    pub fn new(move_bytes: &[u8], nonce: &Nonce, committer: PlayerId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(move_bytes);
        hasher.update(nonce.as_bytes());
        hasher.update(committer.as_bytes());
        let result = hasher.finalize();
        Self(result.into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify that the given move, nonce, and committer produce this commitment
    pub fn verify(&self, move_bytes: &[u8], nonce: &Nonce, committer: PlayerId) -> bool {
        *self == Self::new(move_bytes, nonce, committer)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}
