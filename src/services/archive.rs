use chrono::Utc;

use crate::state::AppState;
use crate::store::{SaveOrder, StoreError};

use super::{lock_deck, today};

/// Moves every item mastered past the deck's threshold into the archive.
/// Files are only rewritten when something moved.
pub async fn run_archive_process(state: &AppState, deck: &str) -> Result<usize, StoreError> {
    let _guard = lock_deck(state, deck).await?;
    let store = state.store();

    let mut data = store.load(deck).await?;
    let archived = data.sweep(today());

    if archived > 0 {
        data.metadata.last_archive_check = Some(Utc::now());
        store.save(deck, &data, SaveOrder::ArchiveFirst).await?;
        tracing::info!(deck = %deck, archived, "archived mastered words");
    } else {
        tracing::debug!(deck = %deck, "nothing to archive");
    }

    Ok(archived)
}

/// Sends an archived item back to active practice.
pub async fn unarchive_word(state: &AppState, deck: &str, word_id: u64) -> Result<bool, StoreError> {
    let _guard = lock_deck(state, deck).await?;
    let store = state.store();

    let mut data = store.load(deck).await?;
    if !data.unarchive(word_id, today()) {
        tracing::debug!(deck = %deck, word_id, "unarchive requested for unknown word");
        return Ok(false);
    }

    store.save(deck, &data, SaveOrder::ActiveFirst).await?;
    tracing::info!(deck = %deck, word_id, "word unarchived");
    Ok(true)
}
