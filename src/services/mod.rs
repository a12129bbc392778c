pub mod archive;
pub mod learning;

use chrono::{NaiveDate, Utc};
use tokio::sync::OwnedMutexGuard;

use crate::engine::EngineError;
use crate::state::AppState;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum LearningError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Calendar date used for attempts, mastery and archiving (UTC).
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Serializes work on one deck. Hold the guard for the whole
/// load, mutate and save cycle.
pub async fn lock_deck(state: &AppState, deck: &str) -> Result<OwnedMutexGuard<()>, StoreError> {
    let lock = state
        .deck_lock(deck)
        .ok_or_else(|| StoreError::UnknownDeck(deck.to_string()))?;
    Ok(lock.lock_owned().await)
}
