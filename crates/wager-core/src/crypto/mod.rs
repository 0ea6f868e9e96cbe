//! Commit-reveal primitives.

mod commitment;

pub use commitment::{Commitment, Nonce};
