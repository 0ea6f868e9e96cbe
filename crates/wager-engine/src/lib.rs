//! Wager Engine Library
//!
//! This crate provides the match engine for escrowed commit-reveal
//! Rock-Paper-Scissors wagers: the credit ledger, the per-host match slot
//! state machine, the resolution rules, and the orchestrator that ties
//! them together.

pub mod arena;
pub mod error;
pub mod events;
pub mod ledger;
pub mod rps;
pub mod slot;

pub use arena::{Arena, ArenaConfig};
pub use error::EngineError;
pub use events::{Event, TimeoutOutcome};
pub use rps::{judge, Move, RoundOutcome};
pub use slot::{MatchSlot, Phase};
