//! Application state for the service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wager_core::{MockTransferClient, PlayerId};
use wager_engine::{Arena, ArenaConfig};

/// Shared service state: the engine plus the demo transfer layer and a
/// name registry for registered players.
#[derive(Clone)]
pub struct AppState {
    arena: Arena,
    transfer: Arc<MockTransferClient>,
    players: Arc<Mutex<HashMap<PlayerId, String>>>,
}

impl AppState {
    pub fn new(config: ArenaConfig) -> Self {
        let transfer = Arc::new(MockTransferClient::new());
        Self {
            arena: Arena::new(transfer.clone(), config),
            transfer,
            players: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The mock transfer layer backing the demo (faucet target)
    pub fn transfer(&self) -> &MockTransferClient {
        &self.transfer
    }

    pub fn register_player(&self, name: String) -> PlayerId {
        let id = PlayerId::new();
        self.players.lock().unwrap().insert(id, name);
        id
    }

    pub fn player_name(&self, id: PlayerId) -> Option<String> {
        self.players.lock().unwrap().get(&id).cloned()
    }
}
