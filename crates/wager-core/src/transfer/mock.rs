//! Mock transfer client for testing.

use super::traits::{TransferError, TransferProvider};
use crate::identity::PlayerId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory mock of the external transfer mechanism.
///
/// Keeps per-player external balances and pull allowances, plus a custody
/// tally of everything currently pulled in. A pull fails unless both the
/// external balance and the allowance cover the amount.
#[derive(Clone, Default)]
pub struct MockTransferClient {
    inner: Arc<Mutex<MockTransferInner>>,
}

#[derive(Default)]
struct MockTransferInner {
    balances: HashMap<PlayerId, u64>,
    allowances: HashMap<PlayerId, u64>,
    custody: u64,
}

impl MockTransferClient {
    /// Create a new mock client with empty accounts
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a player's external balance
    pub fn set_balance(&self, id: PlayerId, amount: u64) {
        self.inner.lock().unwrap().balances.insert(id, amount);
    }

    /// Credit a player's external balance
    pub fn fund(&self, id: PlayerId, amount: u64) {
        let mut inner = self.inner.lock().unwrap();
        *inner.balances.entry(id).or_insert(0) += amount;
    }

    /// Approve the engine to pull up to `amount` from the player
    pub fn approve(&self, id: PlayerId, amount: u64) {
        self.inner.lock().unwrap().allowances.insert(id, amount);
    }

    /// Get a player's external balance
    pub fn external_balance(&self, id: PlayerId) -> u64 {
        *self.inner.lock().unwrap().balances.get(&id).unwrap_or(&0)
    }

    /// Total held in custody
    pub fn custody(&self) -> u64 {
        self.inner.lock().unwrap().custody
    }
}

#[async_trait]
impl TransferProvider for MockTransferClient {
    async fn pull_from(&self, id: PlayerId, amount: u64) -> Result<(), TransferError> {
        let mut inner = self.inner.lock().unwrap();

        let allowance = *inner.allowances.get(&id).unwrap_or(&0);
        if allowance < amount {
            return Err(TransferError::InsufficientAllowance);
        }

        let balance = *inner.balances.get(&id).unwrap_or(&0);
        if balance < amount {
            return Err(TransferError::InsufficientBalance);
        }

        inner.allowances.insert(id, allowance - amount);
        inner.balances.insert(id, balance - amount);
        inner.custody += amount;
        Ok(())
    }

    async fn push_to(&self, id: PlayerId, amount: u64) -> Result<(), TransferError> {
        let mut inner = self.inner.lock().unwrap();

        let custody = inner
            .custody
            .checked_sub(amount)
            .ok_or_else(|| TransferError::ProviderUnavailable("custody underflow".to_string()))?;

        inner.custody = custody;
        *inner.balances.entry(id).or_insert(0) += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pull_and_push_roundtrip() {
        let client = MockTransferClient::new();
        let id = PlayerId::new();
        client.set_balance(id, 1000);
        client.approve(id, 1000);

        client.pull_from(id, 400).await.unwrap();
        assert_eq!(client.external_balance(id), 600);
        assert_eq!(client.custody(), 400);

        client.push_to(id, 400).await.unwrap();
        assert_eq!(client.external_balance(id), 1000);
        assert_eq!(client.custody(), 0);
    }

    #[tokio::test]
    async fn test_pull_without_allowance_fails() {
        let client = MockTransferClient::new();
        let id = PlayerId::new();
        client.set_balance(id, 1000);

        let result = client.pull_from(id, 100).await;
        assert!(matches!(result, Err(TransferError::InsufficientAllowance)));
        assert_eq!(client.external_balance(id), 1000);
        assert_eq!(client.custody(), 0);
    }

    #[tokio::test]
    async fn test_pull_exceeding_balance_fails() {
        let client = MockTransferClient::new();
        let id = PlayerId::new();
        client.set_balance(id, 50);
        client.approve(id, 1000);

        let result = client.pull_from(id, 100).await;
        assert!(matches!(result, Err(TransferError::InsufficientBalance)));
        assert_eq!(client.external_balance(id), 50);
        assert_eq!(client.custody(), 0);
    }

    #[tokio::test]
    async fn test_allowance_is_consumed() {
        let client = MockTransferClient::new();
        let id = PlayerId::new();
        client.set_balance(id, 1000);
        client.approve(id, 100);

        client.pull_from(id, 100).await.unwrap();
        let result = client.pull_from(id, 1).await;
        assert!(matches!(result, Err(TransferError::InsufficientAllowance)));
    }

    #[tokio::test]
    async fn test_push_beyond_custody_fails() {
        let client = MockTransferClient::new();
        let id = PlayerId::new();

        let result = client.push_to(id, 1).await;
        assert!(matches!(
            result,
            Err(TransferError::ProviderUnavailable(_))
        ));
    }
}
