//! Rock-Paper-Scissors moves and the outcome rule.

use serde::{Deserialize, Serialize};

/// Rock-Paper-Scissors move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// Convert to bytes for commitment
    pub fn to_bytes(&self) -> &[u8] {
        match self {
            Move::Rock => b"Rock",
            Move::Paper => b"Paper",
            Move::Scissors => b"Scissors",
        }
    }

    /// Check if this move beats the other (Rock > Scissors > Paper > Rock)
    pub fn beats(&self, other: &Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors)
                | (Move::Scissors, Move::Paper)
                | (Move::Paper, Move::Rock)
        )
    }
}

/// Outcome of a resolved round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    HostWins,
    ChallengerWins,
    Draw,
}

/// Determine the round outcome from both revealed moves
pub fn judge(host_move: Move, challenger_move: Move) -> RoundOutcome {
    if host_move == challenger_move {
        RoundOutcome::Draw
    } else if host_move.beats(&challenger_move) {
        RoundOutcome::HostWins
    } else {
        RoundOutcome::ChallengerWins
    }
}
