//! Internal credit bookkeeping.
//!
//! The ledger only moves numbers; it never touches the external transfer
//! mechanism. The orchestrator is responsible for calling the transfer layer
//! in the right order around these mutations.

use crate::error::EngineError;
use std::collections::HashMap;
use wager_core::PlayerId;

/// Per-player credit balances plus the total currently held in escrow.
///
/// Invariant: the sum of all balances plus `escrowed` equals the net amount
/// pulled into custody through the transfer layer.
#[derive(Debug, Default)]
pub struct Ledger {
    balances: HashMap<PlayerId, u64>,
    escrowed: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit balance for a player (zero if never seen)
    pub fn balance(&self, id: PlayerId) -> u64 {
        *self.balances.get(&id).unwrap_or(&0)
    }

    /// Total currently escrowed against open matches
    pub fn escrowed_total(&self) -> u64 {
        self.escrowed
    }

    /// Add credit to a player's balance
    pub fn credit(&mut self, id: PlayerId, amount: u64) {
        *self.balances.entry(id).or_insert(0) += amount;
    }

    /// Remove credit from a player's balance
    pub fn debit(&mut self, id: PlayerId, amount: u64) -> Result<(), EngineError> {
        let balance = self.balance(id);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(EngineError::AmountExceedsBalance)?;
        self.balances.insert(id, remaining);
        Ok(())
    }

    /// Move credit from a player's balance into escrow
    pub fn escrow(&mut self, id: PlayerId, amount: u64) -> Result<(), EngineError> {
        self.debit(id, amount)?;
        self.escrowed += amount;
        Ok(())
    }

    /// Move escrowed funds onto a player's balance
    pub fn release(&mut self, id: PlayerId, amount: u64) {
        self.escrowed = self.escrowed.saturating_sub(amount);
        self.credit(id, amount);
    }
}
