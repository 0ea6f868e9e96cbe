//! Notifications emitted by the engine.
//!
//! These are the sole mechanism by which external indexers discover open
//! and resolved matches; the engine itself keeps no match history.

use crate::rps::Move;
use serde::{Deserialize, Serialize};
use wager_core::PlayerId;

/// How a timed-out match was settled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutOutcome {
    /// Nobody joined before the betting deadline; host refunded
    NoChallenger,
    /// Only the host revealed; host takes the pot
    HostRevealedOnly,
    /// Only the challenger revealed; challenger takes the pot
    ChallengerRevealedOnly,
    /// Neither side revealed; both bets refunded
    NoReveals,
}

/// Engine notification
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Deposited {
        player: PlayerId,
        amount: u64,
    },
    Withdrawn {
        player: PlayerId,
        amount: u64,
    },
    HostedMatch {
        host: PlayerId,
        bet: u64,
    },
    Joined {
        host: PlayerId,
        challenger: PlayerId,
        bet: u64,
    },
    Revealed {
        host: PlayerId,
        player: PlayerId,
        r#move: Move,
    },
    /// Normal resolution: `winner` is None on a draw. `payout` is the
    /// amount credited to the winner, or the per-player refund on a draw.
    Resolved {
        host: PlayerId,
        winner: Option<PlayerId>,
        payout: u64,
    },
    TimedOut {
        host: PlayerId,
        outcome: TimeoutOutcome,
    },
}
