//! Match orchestrator.
//!
//! The arena owns the ledger and the per-host match slots and applies every
//! public operation atomically: all bookkeeping happens under one lock, and
//! any mutation that triggers an external transfer updates internal state
//! strictly before invoking the transfer. A resolved slot is removed from
//! the map before any funds are released, so a second resolution of the
//! same slot cannot observe stale escrow state.

use crate::error::EngineError;
use crate::events::{Event, TimeoutOutcome};
use crate::ledger::Ledger;
use crate::rps::{judge, Move, RoundOutcome};
use crate::slot::{MatchSlot, Phase};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wager_core::{Commitment, Nonce, PlayerId, TransferProvider};

/// Deadline windows for the two timed phases
#[derive(Clone, Copy, Debug)]
pub struct ArenaConfig {
    /// Seconds a hosted match stays joinable
    pub join_window_secs: i64,
    /// Seconds both sides have to reveal once joined
    pub reveal_window_secs: i64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            join_window_secs: 3600,
            reveal_window_secs: 600,
        }
    }
}

/// Shared match engine state
#[derive(Clone)]
pub struct Arena {
    inner: Arc<Mutex<ArenaInner>>,
    transfer: Arc<dyn TransferProvider>,
    join_window: Duration,
    reveal_window: Duration,
}

struct ArenaInner {
    ledger: Ledger,
    slots: HashMap<PlayerId, MatchSlot>,
    events: Vec<Event>,
    /// Simulated current time (for timeout testing)
    current_time: Option<DateTime<Utc>>,
}

impl ArenaInner {
    fn now(&self) -> DateTime<Utc> {
        self.current_time.unwrap_or_else(Utc::now)
    }
}

impl Arena {
    pub fn new(transfer: Arc<dyn TransferProvider>, config: ArenaConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ArenaInner {
                ledger: Ledger::new(),
                slots: HashMap::new(),
                events: Vec::new(),
                current_time: None,
            })),
            transfer,
            join_window: Duration::seconds(config.join_window_secs),
            reveal_window: Duration::seconds(config.reveal_window_secs),
        }
    }

    // Clock

    /// Get current time (real or simulated)
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.lock().unwrap().now()
    }

    /// Advance simulated time by seconds
    pub fn advance_time(&self, seconds: i64) {
        let mut inner = self.inner.lock().unwrap();
        let current = inner.now();
        inner.current_time = Some(current + Duration::seconds(seconds));
    }

    // Ledger operations

    /// Pull `amount` from the caller's external account and credit it.
    ///
    /// The external pull happens first; on failure nothing is credited.
    pub async fn deposit(&self, caller: PlayerId, amount: u64) -> Result<(), EngineError> {
        if amount == 0 {
            return Err(EngineError::ZeroValue);
        }

        self.transfer.pull_from(caller, amount).await?;

        let mut inner = self.inner.lock().unwrap();
        inner.ledger.credit(caller, amount);
        inner.events.push(Event::Deposited {
            player: caller,
            amount,
        });
        tracing::info!("deposited {} for {}", amount, caller);
        Ok(())
    }

    /// Debit `amount` from the caller's credit and push it out.
    ///
    /// The debit is applied before the external push; if the push fails the
    /// debit is rolled back and the failure surfaces unchanged.
    pub async fn withdraw_exact(&self, caller: PlayerId, amount: u64) -> Result<(), EngineError> {
        {
            let mut inner = self.inner.lock().unwrap();
            let balance = inner.ledger.balance(caller);
            if balance == 0 {
                return Err(EngineError::ZeroBalance);
            }
            if amount == 0 {
                return Err(EngineError::ZeroValue);
            }
            if amount > balance {
                return Err(EngineError::AmountExceedsBalance);
            }
            inner.ledger.debit(caller, amount)?;
        }

        if let Err(err) = self.transfer.push_to(caller, amount).await {
            let mut inner = self.inner.lock().unwrap();
            inner.ledger.credit(caller, amount);
            return Err(err.into());
        }

        let mut inner = self.inner.lock().unwrap();
        inner.events.push(Event::Withdrawn {
            player: caller,
            amount,
        });
        tracing::info!("withdrew {} for {}", amount, caller);
        Ok(())
    }

    /// Withdraw the caller's entire credit balance
    pub async fn withdraw_all(&self, caller: PlayerId) -> Result<u64, EngineError> {
        let balance = self.inner.lock().unwrap().ledger.balance(caller);
        if balance == 0 {
            return Err(EngineError::ZeroBalance);
        }
        self.withdraw_exact(caller, balance).await?;
        Ok(balance)
    }

    // Match operations

    /// Open the caller's slot with an escrowed bet and a move commitment
    pub fn host(
        &self,
        caller: PlayerId,
        bet: u64,
        commitment: Commitment,
    ) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.slots.contains_key(&caller) {
            return Err(EngineError::UserAlreadyHosting);
        }
        if bet == 0 {
            return Err(EngineError::ZeroValue);
        }
        if inner.ledger.balance(caller) < bet {
            return Err(EngineError::AmountExceedsBalance);
        }

        let deadline = inner.now() + self.join_window;
        inner.ledger.escrow(caller, bet)?;
        inner
            .slots
            .insert(caller, MatchSlot::open(bet, commitment, deadline));
        inner.events.push(Event::HostedMatch { host: caller, bet });
        tracing::info!("{} hosted a match with bet {}", caller, bet);
        Ok(())
    }

    /// Join a hosted match with a matching bet and a move commitment
    pub fn join(
        &self,
        caller: PlayerId,
        host: PlayerId,
        commitment: Commitment,
    ) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().unwrap();

        let bet = {
            let slot = inner.slots.get(&host).ok_or(EngineError::InvalidPhase)?;
            if slot.phase != Phase::Betting || slot.challenger.is_some() {
                return Err(EngineError::InvalidPhase);
            }
            slot.bet
        };
        if inner.ledger.balance(caller) < bet {
            return Err(EngineError::AmountExceedsBalance);
        }

        let deadline = inner.now() + self.reveal_window;
        inner.ledger.escrow(caller, bet)?;
        if let Some(slot) = inner.slots.get_mut(&host) {
            slot.accept_challenger(caller, commitment, deadline);
        }
        inner.events.push(Event::Joined {
            host,
            challenger: caller,
            bet,
        });
        tracing::info!("{} joined match hosted by {}", caller, host);
        Ok(())
    }

    /// Reveal the caller's committed move.
    ///
    /// The reveal is accepted only if it reproduces the stored commitment
    /// for the caller's side. Once both moves are in, the match resolves
    /// immediately.
    pub fn reveal(
        &self,
        caller: PlayerId,
        host: PlayerId,
        mv: Move,
        nonce: &Nonce,
    ) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().unwrap();

        let fully_revealed = {
            let slot = inner.slots.get_mut(&host).ok_or(EngineError::InvalidPhase)?;
            if slot.phase != Phase::Revealing {
                return Err(EngineError::InvalidPhase);
            }

            if caller == host {
                if slot.host_move.is_some() {
                    return Err(EngineError::AlreadyRevealed);
                }
                if !slot.host_commitment.verify(mv.to_bytes(), nonce, caller) {
                    return Err(EngineError::InvalidReveal);
                }
                slot.host_move = Some(mv);
            } else if slot.challenger == Some(caller) {
                if slot.challenger_move.is_some() {
                    return Err(EngineError::AlreadyRevealed);
                }
                let commitment = slot
                    .challenger_commitment
                    .ok_or(EngineError::InvalidPhase)?;
                if !commitment.verify(mv.to_bytes(), nonce, caller) {
                    return Err(EngineError::InvalidReveal);
                }
                slot.challenger_move = Some(mv);
            } else {
                return Err(EngineError::NotAParticipant);
            }
            slot.fully_revealed()
        };

        inner.events.push(Event::Revealed {
            host,
            player: caller,
            r#move: mv,
        });
        tracing::info!("{} revealed in match hosted by {}", caller, host);

        if fully_revealed {
            // Clear the slot before releasing any funds
            if let Some(slot) = inner.slots.remove(&host) {
                Self::resolve(&mut inner, host, slot);
            }
        }
        Ok(())
    }

    /// Settle a match whose deadline has passed. Callable by anyone.
    pub fn claim_timeout(&self, caller: PlayerId, host: PlayerId) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().unwrap();
        let now = inner.now();

        {
            let slot = inner.slots.get(&host).ok_or(EngineError::InvalidPhase)?;
            if now < slot.deadline {
                return Err(EngineError::DeadlineNotReached);
            }
        }
        let slot = match inner.slots.remove(&host) {
            Some(slot) => slot,
            None => return Err(EngineError::InvalidPhase),
        };
        tracing::info!("{} claimed timeout for match hosted by {}", caller, host);

        let outcome = match slot.phase {
            Phase::Betting => {
                inner.ledger.release(host, slot.bet);
                TimeoutOutcome::NoChallenger
            }
            Phase::Revealing => {
                let challenger = match slot.challenger {
                    Some(challenger) => challenger,
                    None => {
                        inner.ledger.release(host, slot.bet);
                        inner.events.push(Event::TimedOut {
                            host,
                            outcome: TimeoutOutcome::NoChallenger,
                        });
                        return Ok(());
                    }
                };
                match (slot.host_move.is_some(), slot.challenger_move.is_some()) {
                    (true, true) => {
                        // Both revealed but nobody resolved; settle normally
                        Self::resolve(&mut inner, host, slot);
                        return Ok(());
                    }
                    (true, false) => {
                        inner.ledger.release(host, 2 * slot.bet);
                        TimeoutOutcome::HostRevealedOnly
                    }
                    (false, true) => {
                        inner.ledger.release(challenger, 2 * slot.bet);
                        TimeoutOutcome::ChallengerRevealedOnly
                    }
                    (false, false) => {
                        inner.ledger.release(host, slot.bet);
                        inner.ledger.release(challenger, slot.bet);
                        TimeoutOutcome::NoReveals
                    }
                }
            }
            Phase::Closed => return Err(EngineError::InvalidPhase),
        };

        inner.events.push(Event::TimedOut { host, outcome });
        Ok(())
    }

    /// Normal resolution with both moves known. The slot has already been
    /// removed from the map by the caller.
    fn resolve(inner: &mut ArenaInner, host: PlayerId, slot: MatchSlot) {
        let (challenger, host_move, challenger_move) =
            match (slot.challenger, slot.host_move, slot.challenger_move) {
                (Some(c), Some(h), Some(m)) => (c, h, m),
                _ => return,
            };

        let (winner, payout) = match judge(host_move, challenger_move) {
            RoundOutcome::Draw => {
                inner.ledger.release(host, slot.bet);
                inner.ledger.release(challenger, slot.bet);
                (None, slot.bet)
            }
            RoundOutcome::HostWins => {
                inner.ledger.release(host, 2 * slot.bet);
                (Some(host), 2 * slot.bet)
            }
            RoundOutcome::ChallengerWins => {
                inner.ledger.release(challenger, 2 * slot.bet);
                (Some(challenger), 2 * slot.bet)
            }
        };

        inner.events.push(Event::Resolved {
            host,
            winner,
            payout,
        });
        match winner {
            Some(winner) => tracing::info!(
                "match hosted by {} resolved, winner {} takes {}",
                host,
                winner,
                payout
            ),
            None => tracing::info!("match hosted by {} resolved as a draw", host),
        }
    }

    // Read accessors

    /// Credit balance for a player
    pub fn balance(&self, id: PlayerId) -> u64 {
        self.inner.lock().unwrap().ledger.balance(id)
    }

    /// Total currently escrowed across all open matches
    pub fn escrowed_total(&self) -> u64 {
        self.inner.lock().unwrap().ledger.escrowed_total()
    }

    /// A host's open slot, if any (absent means Closed)
    pub fn slot(&self, host: PlayerId) -> Option<MatchSlot> {
        self.inner.lock().unwrap().slots.get(&host).cloned()
    }

    /// A host's current phase
    pub fn phase(&self, host: PlayerId) -> Phase {
        self.inner
            .lock()
            .unwrap()
            .slots
            .get(&host)
            .map(|slot| slot.phase)
            .unwrap_or(Phase::Closed)
    }

    /// Snapshot of all emitted notifications
    pub fn events(&self) -> Vec<Event> {
        self.inner.lock().unwrap().events.clone()
    }

    /// Drain all emitted notifications
    pub fn take_events(&self) -> Vec<Event> {
        std::mem::take(&mut self.inner.lock().unwrap().events)
    }
}
