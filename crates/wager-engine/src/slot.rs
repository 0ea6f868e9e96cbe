//! Per-host match slot.

use crate::rps::Move;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wager_core::{Commitment, PlayerId};

/// Match phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Closed,
    Betting,
    Revealing,
}

/// One host's in-progress match.
///
/// A host has at most one live slot; the arena drops the slot entirely when
/// the match resolves, so a stored slot is always in Betting or Revealing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchSlot {
    pub phase: Phase,
    pub bet: u64,
    pub host_commitment: Commitment,
    pub challenger: Option<PlayerId>,
    pub challenger_commitment: Option<Commitment>,
    pub host_move: Option<Move>,
    pub challenger_move: Option<Move>,
    /// Deadline after which `claim_timeout` becomes callable
    pub deadline: DateTime<Utc>,
}

impl MatchSlot {
    /// Create a freshly hosted slot in the Betting phase
    pub fn open(bet: u64, host_commitment: Commitment, deadline: DateTime<Utc>) -> Self {
        Self {
            phase: Phase::Betting,
            bet,
            host_commitment,
            challenger: None,
            challenger_commitment: None,
            host_move: None,
            challenger_move: None,
            deadline,
        }
    }

    /// Record the challenger and move to the Revealing phase
    pub fn accept_challenger(
        &mut self,
        challenger: PlayerId,
        commitment: Commitment,
        deadline: DateTime<Utc>,
    ) {
        self.phase = Phase::Revealing;
        self.challenger = Some(challenger);
        self.challenger_commitment = Some(commitment);
        self.deadline = deadline;
    }

    /// Both moves revealed?
    pub fn fully_revealed(&self) -> bool {
        self.host_move.is_some() && self.challenger_move.is_some()
    }
}
