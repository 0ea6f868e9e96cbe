//! End-to-end match flows: deposits, hosting, joining, reveals, timeouts,
//! and conservation of funds across the ledger and the transfer layer.

use std::sync::Arc;
use wager_core::{Commitment, MockTransferClient, Nonce, PlayerId};
use wager_engine::{Arena, ArenaConfig, EngineError, Event, Move, Phase, TimeoutOutcome};

fn setup() -> (Arena, Arc<MockTransferClient>) {
    let mock = Arc::new(MockTransferClient::new());
    let arena = Arena::new(
        mock.clone(),
        ArenaConfig {
            join_window_secs: 3600,
            reveal_window_secs: 600,
        },
    );
    (arena, mock)
}

async fn funded_player(arena: &Arena, mock: &MockTransferClient, amount: u64) -> PlayerId {
    let id = PlayerId::new();
    mock.set_balance(id, amount);
    mock.approve(id, amount);
    arena.deposit(id, amount).await.unwrap();
    id
}

fn commit(mv: Move, committer: PlayerId) -> (Commitment, Nonce) {
    let nonce = Nonce::random();
    (Commitment::new(mv.to_bytes(), &nonce, committer), nonce)
}

#[tokio::test]
async fn test_deposit_withdraw_sequence() {
    let (arena, mock) = setup();
    let id = PlayerId::new();
    mock.set_balance(id, 100);
    mock.approve(id, 100);

    arena.deposit(id, 60).await.unwrap();
    arena.deposit(id, 40).await.unwrap();
    assert_eq!(arena.balance(id), 100);
    assert_eq!(mock.custody(), 100);

    arena.withdraw_exact(id, 30).await.unwrap();
    assert_eq!(arena.balance(id), 70);
    assert_eq!(mock.external_balance(id), 30);

    // Over-withdrawal is rejected and leaves the balance unchanged
    let result = arena.withdraw_exact(id, 71).await;
    assert!(matches!(result, Err(EngineError::AmountExceedsBalance)));
    assert_eq!(arena.balance(id), 70);

    let amount = arena.withdraw_all(id).await.unwrap();
    assert_eq!(amount, 70);
    assert_eq!(arena.balance(id), 0);
    assert_eq!(mock.external_balance(id), 100);
    assert_eq!(mock.custody(), 0);
}

/// Scenario A: full match, host wins with Rock vs Scissors.
#[tokio::test]
async fn test_full_match_host_wins() {
    let (arena, mock) = setup();
    let host = funded_player(&arena, &mock, 10).await;
    let challenger = funded_player(&arena, &mock, 10).await;

    let (host_commitment, host_nonce) = commit(Move::Rock, host);
    let (challenger_commitment, challenger_nonce) = commit(Move::Scissors, challenger);

    arena.host(host, 5, host_commitment).unwrap();
    arena.join(challenger, host, challenger_commitment).unwrap();
    assert_eq!(arena.phase(host), Phase::Revealing);
    assert_eq!(arena.escrowed_total(), 10);

    arena.reveal(host, host, Move::Rock, &host_nonce).unwrap();
    arena
        .reveal(challenger, host, Move::Scissors, &challenger_nonce)
        .unwrap();

    assert_eq!(arena.balance(host), 15);
    assert_eq!(arena.balance(challenger), 5);
    assert_eq!(arena.escrowed_total(), 0);
    assert_eq!(arena.phase(host), Phase::Closed);

    let events = arena.events();
    assert!(events.contains(&Event::Resolved {
        host,
        winner: Some(host),
        payout: 10,
    }));
}

#[tokio::test]
async fn test_full_match_draw_refunds_both() {
    let (arena, mock) = setup();
    let host = funded_player(&arena, &mock, 10).await;
    let challenger = funded_player(&arena, &mock, 10).await;

    let (host_commitment, host_nonce) = commit(Move::Paper, host);
    let (challenger_commitment, challenger_nonce) = commit(Move::Paper, challenger);

    arena.host(host, 5, host_commitment).unwrap();
    arena.join(challenger, host, challenger_commitment).unwrap();
    arena.reveal(host, host, Move::Paper, &host_nonce).unwrap();
    arena
        .reveal(challenger, host, Move::Paper, &challenger_nonce)
        .unwrap();

    assert_eq!(arena.balance(host), 10);
    assert_eq!(arena.balance(challenger), 10);
    assert_eq!(arena.phase(host), Phase::Closed);

    let events = arena.events();
    assert!(events.contains(&Event::Resolved {
        host,
        winner: None,
        payout: 5,
    }));
}

/// Scenario B: nobody joins; after the betting deadline anyone can claim
/// the timeout and the host is refunded.
#[tokio::test]
async fn test_betting_timeout_refunds_host() {
    let (arena, mock) = setup();
    let host = funded_player(&arena, &mock, 10).await;
    let (commitment, _) = commit(Move::Rock, host);

    arena.host(host, 5, commitment).unwrap();
    assert_eq!(arena.balance(host), 5);

    arena.advance_time(3601);
    let bystander = PlayerId::new();
    arena.claim_timeout(bystander, host).unwrap();

    assert_eq!(arena.balance(host), 10);
    assert_eq!(arena.escrowed_total(), 0);
    assert_eq!(arena.phase(host), Phase::Closed);

    let events = arena.events();
    assert!(events.contains(&Event::TimedOut {
        host,
        outcome: TimeoutOutcome::NoChallenger,
    }));
}

/// Scenario C: only the host reveals; after the reveal deadline the host
/// takes the whole pot.
#[tokio::test]
async fn test_reveal_timeout_single_revealer_takes_pot() {
    let (arena, mock) = setup();
    let host = funded_player(&arena, &mock, 10).await;
    let challenger = funded_player(&arena, &mock, 10).await;

    let (host_commitment, host_nonce) = commit(Move::Rock, host);
    let (challenger_commitment, _) = commit(Move::Paper, challenger);
    arena.host(host, 5, host_commitment).unwrap();
    arena.join(challenger, host, challenger_commitment).unwrap();
    arena.reveal(host, host, Move::Rock, &host_nonce).unwrap();

    arena.advance_time(601);
    arena.claim_timeout(PlayerId::new(), host).unwrap();

    assert_eq!(arena.balance(host), 15);
    assert_eq!(arena.balance(challenger), 5);
    assert_eq!(arena.phase(host), Phase::Closed);

    let events = arena.events();
    assert!(events.contains(&Event::TimedOut {
        host,
        outcome: TimeoutOutcome::HostRevealedOnly,
    }));
}

/// Scenario D: neither side reveals; both recover exactly their own bet.
#[tokio::test]
async fn test_reveal_timeout_no_reveals_refunds_both() {
    let (arena, mock) = setup();
    let host = funded_player(&arena, &mock, 10).await;
    let challenger = funded_player(&arena, &mock, 10).await;

    let (host_commitment, _) = commit(Move::Rock, host);
    let (challenger_commitment, _) = commit(Move::Paper, challenger);
    arena.host(host, 5, host_commitment).unwrap();
    arena.join(challenger, host, challenger_commitment).unwrap();

    arena.advance_time(601);
    arena.claim_timeout(PlayerId::new(), host).unwrap();

    assert_eq!(arena.balance(host), 10);
    assert_eq!(arena.balance(challenger), 10);
    assert_eq!(arena.escrowed_total(), 0);

    let events = arena.events();
    assert!(events.contains(&Event::TimedOut {
        host,
        outcome: TimeoutOutcome::NoReveals,
    }));
}

#[tokio::test]
async fn test_challenger_only_reveal_wins_on_timeout() {
    let (arena, mock) = setup();
    let host = funded_player(&arena, &mock, 10).await;
    let challenger = funded_player(&arena, &mock, 10).await;

    let (host_commitment, _) = commit(Move::Rock, host);
    let (challenger_commitment, challenger_nonce) = commit(Move::Paper, challenger);
    arena.host(host, 5, host_commitment).unwrap();
    arena.join(challenger, host, challenger_commitment).unwrap();
    arena
        .reveal(challenger, host, Move::Paper, &challenger_nonce)
        .unwrap();

    arena.advance_time(601);
    arena.claim_timeout(PlayerId::new(), host).unwrap();

    assert_eq!(arena.balance(host), 5);
    assert_eq!(arena.balance(challenger), 15);
}

#[tokio::test]
async fn test_second_claim_timeout_fails_without_fund_movement() {
    let (arena, mock) = setup();
    let host = funded_player(&arena, &mock, 10).await;
    let (commitment, _) = commit(Move::Rock, host);
    arena.host(host, 5, commitment).unwrap();

    arena.advance_time(3601);
    arena.claim_timeout(PlayerId::new(), host).unwrap();
    assert_eq!(arena.balance(host), 10);

    let result = arena.claim_timeout(PlayerId::new(), host);
    assert!(matches!(result, Err(EngineError::InvalidPhase)));
    assert_eq!(arena.balance(host), 10);
    assert_eq!(arena.escrowed_total(), 0);
}

#[tokio::test]
async fn test_reveal_within_deadline_beats_unclaimed_timeout() {
    // The reveal deadline is a hard cutoff only through claim_timeout:
    // a late reveal still lands if nobody has claimed yet.
    let (arena, mock) = setup();
    let host = funded_player(&arena, &mock, 10).await;
    let challenger = funded_player(&arena, &mock, 10).await;

    let (host_commitment, host_nonce) = commit(Move::Rock, host);
    let (challenger_commitment, challenger_nonce) = commit(Move::Scissors, challenger);
    arena.host(host, 5, host_commitment).unwrap();
    arena.join(challenger, host, challenger_commitment).unwrap();
    arena.reveal(host, host, Move::Rock, &host_nonce).unwrap();

    arena.advance_time(601);
    arena
        .reveal(challenger, host, Move::Scissors, &challenger_nonce)
        .unwrap();

    // Normal resolution ran; nothing left for a timeout claim
    assert_eq!(arena.balance(host), 15);
    assert!(matches!(
        arena.claim_timeout(PlayerId::new(), host),
        Err(EngineError::InvalidPhase)
    ));
}

#[tokio::test]
async fn test_host_can_play_again_after_resolution() {
    let (arena, mock) = setup();
    let host = funded_player(&arena, &mock, 10).await;
    let challenger = funded_player(&arena, &mock, 10).await;

    let (host_commitment, host_nonce) = commit(Move::Rock, host);
    let (challenger_commitment, challenger_nonce) = commit(Move::Scissors, challenger);
    arena.host(host, 5, host_commitment).unwrap();
    arena.join(challenger, host, challenger_commitment).unwrap();
    arena.reveal(host, host, Move::Rock, &host_nonce).unwrap();
    arena
        .reveal(challenger, host, Move::Scissors, &challenger_nonce)
        .unwrap();

    // Slot is Closed again; a fresh host call succeeds
    let (second_commitment, _) = commit(Move::Paper, host);
    arena.host(host, 15, second_commitment).unwrap();
    assert_eq!(arena.phase(host), Phase::Betting);
    assert_eq!(arena.balance(host), 0);
    assert_eq!(arena.escrowed_total(), 15);
}

#[tokio::test]
async fn test_conservation_across_full_match() {
    let (arena, mock) = setup();
    let host = funded_player(&arena, &mock, 20).await;
    let challenger = funded_player(&arena, &mock, 30).await;

    let check = |arena: &Arena, mock: &MockTransferClient| {
        let total = arena.balance(host) + arena.balance(challenger) + arena.escrowed_total();
        assert_eq!(total, mock.custody());
    };
    check(&arena, &mock);

    let (host_commitment, host_nonce) = commit(Move::Scissors, host);
    let (challenger_commitment, challenger_nonce) = commit(Move::Paper, challenger);
    arena.host(host, 7, host_commitment).unwrap();
    check(&arena, &mock);

    arena.join(challenger, host, challenger_commitment).unwrap();
    check(&arena, &mock);

    arena
        .reveal(host, host, Move::Scissors, &host_nonce)
        .unwrap();
    check(&arena, &mock);

    arena
        .reveal(challenger, host, Move::Paper, &challenger_nonce)
        .unwrap();
    check(&arena, &mock);

    // Scissors beats Paper
    assert_eq!(arena.balance(host), 27);
    assert_eq!(arena.balance(challenger), 23);

    arena.withdraw_all(host).await.unwrap();
    arena.withdraw_all(challenger).await.unwrap();
    assert_eq!(mock.custody(), 0);
    assert_eq!(mock.external_balance(host), 27);
    assert_eq!(mock.external_balance(challenger), 23);
}
