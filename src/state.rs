use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::store::DeckStore;

/// Shared handler state. Each deck has its own lock so a read-modify-write
/// of a deck never interleaves with another one on the same deck.
#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    store: Arc<DeckStore>,
    deck_locks: Arc<HashMap<String, Arc<Mutex<()>>>>,
}

impl AppState {
    pub fn new(store: DeckStore) -> Self {
        let deck_locks = store
            .decks()
            .iter()
            .map(|deck| (deck.clone(), Arc::new(Mutex::new(()))))
            .collect();

        Self {
            started_at: Instant::now(),
            store: Arc::new(store),
            deck_locks: Arc::new(deck_locks),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn store(&self) -> &DeckStore {
        &self.store
    }

    pub fn deck_lock(&self, deck: &str) -> Option<Arc<Mutex<()>>> {
        self.deck_locks.get(deck).cloned()
    }
}
