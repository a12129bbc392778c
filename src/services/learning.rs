use chrono::Utc;
use serde::Serialize;

use crate::engine::{
    ArchiveReviewOutcome, ArchivedItem, AttemptOutcome, Item, Language, LearningStats,
    MasteryChange, Metadata, Session, SessionMode, SessionResult, SessionStats,
};
use crate::state::AppState;
use crate::store::{SaveOrder, StoreError, WordFile};

use super::{lock_deck, today, LearningError};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedSession {
    pub stats: SessionStats,
    pub archived: usize,
}

pub async fn start_session(
    state: &AppState,
    deck: &str,
    mode: SessionMode,
    count: Option<usize>,
) -> Result<Session, LearningError> {
    let _guard = lock_deck(state, deck).await?;
    let data = state.store().load(deck).await?;

    let session = {
        let mut rng = rand::rng();
        data.start_session(mode, count, &mut rng)
    };

    match &session {
        Ok(session) => {
            tracing::debug!(deck = %deck, mode = %mode, cards = session.cards.len(), "session dealt")
        }
        Err(err) => tracing::info!(deck = %deck, error = %err, "session refused"),
    }

    Ok(session?)
}

pub async fn record_attempt(
    state: &AppState,
    deck: &str,
    word_id: u64,
    correct: bool,
    response_time_ms: u64,
) -> Result<AttemptOutcome, StoreError> {
    let _guard = lock_deck(state, deck).await?;
    let store = state.store();

    let mut data = store.load(deck).await?;
    let outcome = data.record_attempt(word_id, correct, response_time_ms, today());

    match outcome {
        AttemptOutcome::Ignored => {
            tracing::debug!(deck = %deck, word_id, "attempt for unknown word ignored");
        }
        AttemptOutcome::Recorded { streak, change } => {
            store.save_active(deck, &data.active).await?;
            match change {
                MasteryChange::Gained => tracing::info!(deck = %deck, word_id, streak, "word mastered"),
                MasteryChange::Revoked => tracing::info!(deck = %deck, word_id, "mastery revoked"),
                MasteryChange::Unchanged => {}
            }
        }
    }

    Ok(outcome)
}

pub async fn record_archive_review(
    state: &AppState,
    deck: &str,
    word_id: u64,
    correct: bool,
) -> Result<ArchiveReviewOutcome, StoreError> {
    let _guard = lock_deck(state, deck).await?;
    let store = state.store();

    let mut data = store.load(deck).await?;
    let outcome = data.record_archive_review_attempt(word_id, correct, today());

    match outcome {
        ArchiveReviewOutcome::Ignored => {
            tracing::debug!(deck = %deck, word_id, "archive review for unknown word ignored");
        }
        ArchiveReviewOutcome::Kept { .. } => {
            store.save_archived(deck, &data.archived).await?;
        }
        ArchiveReviewOutcome::Unarchived => {
            store.save(deck, &data, SaveOrder::ActiveFirst).await?;
            tracing::warn!(deck = %deck, word_id, "word unarchived after failed reviews");
        }
    }

    Ok(outcome)
}

/// Folds the session results into the deck statistics, then sweeps the deck.
pub async fn finish_session(
    state: &AppState,
    deck: &str,
    results: &[bool],
    duration_ms: Option<u64>,
) -> Result<FinishedSession, StoreError> {
    let _guard = lock_deck(state, deck).await?;
    let store = state.store();
    let today = today();

    let mut data = store.load(deck).await?;
    data.finish_session(SessionResult {
        results,
        duration_ms,
        date: today,
    });
    let archived = data.sweep(today);
    data.metadata.last_archive_check = Some(Utc::now());
    store.save(deck, &data, SaveOrder::ArchiveFirst).await?;

    tracing::info!(
        deck = %deck,
        cards = results.len(),
        correct = results.iter().filter(|r| **r).count(),
        archived,
        "session finished"
    );

    Ok(FinishedSession {
        stats: data.metadata.stats,
        archived,
    })
}

pub async fn deck_stats(state: &AppState, deck: &str) -> Result<LearningStats, StoreError> {
    let _guard = lock_deck(state, deck).await?;
    Ok(state.store().load(deck).await?.stats())
}

pub async fn check_answer(
    state: &AppState,
    deck: &str,
    word_id: u64,
    answer: &str,
    language: Option<Language>,
) -> Result<bool, LearningError> {
    let _guard = lock_deck(state, deck).await?;
    let data = state.store().load(deck).await?;
    Ok(data.check_answer(word_id, answer, language)?)
}

pub async fn replace_active(
    state: &AppState,
    deck: &str,
    file: WordFile<Item>,
) -> Result<usize, StoreError> {
    let _guard = lock_deck(state, deck).await?;
    state.store().save_active(deck, &file.words).await?;
    Ok(file.words.len())
}

pub async fn replace_archived(
    state: &AppState,
    deck: &str,
    file: WordFile<ArchivedItem>,
) -> Result<usize, StoreError> {
    let _guard = lock_deck(state, deck).await?;
    state.store().save_archived(deck, &file.words).await?;
    Ok(file.words.len())
}

pub async fn replace_metadata(
    state: &AppState,
    deck: &str,
    metadata: Metadata,
) -> Result<(), StoreError> {
    let _guard = lock_deck(state, deck).await?;
    state.store().save_metadata(deck, &metadata).await
}
