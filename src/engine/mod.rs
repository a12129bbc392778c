//! Learning engine: card selection, progress tracking and archiving.
//!
//! Every operation works on in-memory pools handed in by the caller and
//! takes the current date as an argument. Nothing in here performs I/O.

pub mod archive;
pub mod progress;
pub mod scoring;
pub mod selection;
pub mod session;
pub mod types;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use progress::{ArchiveReviewOutcome, AttemptOutcome, MasteryChange};
pub use selection::SessionMode;
pub use session::{LearningStats, Session, SessionCard, SessionResult, SessionStats};
pub use types::{
    ArchivedItem, Attempt, Difficulty, Item, ItemContent, Mastery, Metadata, Settings,
    MASTERY_STREAK,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("no {mode} cards available")]
    EmptySelectionPool { mode: SessionMode },
    #[error("item {id} not found")]
    UnknownItem { id: u64 },
}

/// Translation list an answer is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Pt,
}

/// Everything stored for one deck.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub active: Vec<Item>,
    pub archived: Vec<ArchivedItem>,
    pub metadata: Metadata,
}

impl Deck {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            active: Vec::new(),
            archived: Vec::new(),
            metadata,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.metadata.settings
    }

    /// Default card count for a mode.
    pub fn session_length(&self, mode: SessionMode) -> usize {
        match mode {
            SessionMode::Practice => self.settings().session_length,
            SessionMode::Review | SessionMode::Archive => self.settings().review_session_length,
        }
    }

    pub fn select<R: Rng>(&self, mode: SessionMode, count: usize, rng: &mut R) -> Vec<SessionCard> {
        match mode {
            SessionMode::Practice => selection::select_for_practice(&self.active, count, rng)
                .into_iter()
                .cloned()
                .map(SessionCard::Active)
                .collect(),
            SessionMode::Review => selection::select_for_review(&self.active, count)
                .into_iter()
                .cloned()
                .map(SessionCard::Active)
                .collect(),
            SessionMode::Archive => selection::select_for_archive_review(&self.archived, count)
                .into_iter()
                .cloned()
                .map(SessionCard::Archived)
                .collect(),
        }
    }

    /// Deals a session. An empty pool is an error so no empty round starts.
    pub fn start_session<R: Rng>(
        &self,
        mode: SessionMode,
        count: Option<usize>,
        rng: &mut R,
    ) -> Result<Session, EngineError> {
        let count = count.unwrap_or_else(|| self.session_length(mode));
        let cards = self.select(mode, count, rng);
        if cards.is_empty() {
            return Err(EngineError::EmptySelectionPool { mode });
        }
        Ok(Session::new(mode, cards))
    }

    pub fn record_attempt(
        &mut self,
        item_id: u64,
        correct: bool,
        response_time_ms: u64,
        today: NaiveDate,
    ) -> AttemptOutcome {
        progress::record_attempt(&mut self.active, item_id, correct, response_time_ms, today)
    }

    pub fn record_archive_review_attempt(
        &mut self,
        item_id: u64,
        correct: bool,
        today: NaiveDate,
    ) -> ArchiveReviewOutcome {
        let threshold = self.settings().unarchive_failure_threshold;
        let outcome = progress::record_archive_review_attempt(
            &mut self.archived,
            &mut self.active,
            item_id,
            correct,
            threshold,
            today,
        );
        if outcome == ArchiveReviewOutcome::Unarchived {
            self.refresh_pool_counts();
        }
        outcome
    }

    /// Archives every item mastered at least `archiveThresholdDays` ago and
    /// returns how many moved.
    pub fn sweep(&mut self, today: NaiveDate) -> usize {
        let threshold = self.settings().archive_threshold_days;
        let result = archive::sweep(
            std::mem::take(&mut self.active),
            std::mem::take(&mut self.archived),
            threshold,
            today,
        );
        self.active = result.active;
        self.archived = result.archived;

        if result.archived_count > 0 {
            self.refresh_pool_counts();
        }
        result.archived_count
    }

    pub fn unarchive(&mut self, item_id: u64, today: NaiveDate) -> bool {
        let restored = archive::unarchive(&mut self.archived, &mut self.active, item_id, today).is_some();
        if restored {
            self.refresh_pool_counts();
        }
        restored
    }

    /// Folds a finished session into the deck statistics.
    pub fn finish_session(&mut self, session: SessionResult<'_>) -> &SessionStats {
        self.metadata.stats = self
            .metadata
            .stats
            .fold(session, &self.active, self.archived.len());
        &self.metadata.stats
    }

    pub fn stats(&self) -> LearningStats {
        LearningStats::collect(&self.active, self.archived.len(), &self.metadata.stats)
    }

    /// Checks a typed answer against an item in either pool. Without a
    /// language every translation is accepted.
    pub fn check_answer(
        &self,
        item_id: u64,
        input: &str,
        language: Option<Language>,
    ) -> Result<bool, EngineError> {
        let content = self
            .find_content(item_id)
            .ok_or(EngineError::UnknownItem { id: item_id })?;

        let correct = match language {
            Some(Language::En) => scoring::is_correct_answer(input, &content.en),
            Some(Language::Pt) => scoring::is_correct_answer(input, &content.pt),
            None => {
                let accepted: Vec<&str> = content
                    .en
                    .iter()
                    .chain(&content.pt)
                    .map(String::as_str)
                    .collect();
                scoring::is_correct_answer(input, &accepted)
            }
        };
        Ok(correct)
    }

    pub fn find_content(&self, item_id: u64) -> Option<&ItemContent> {
        self.active
            .iter()
            .map(|i| &i.content)
            .chain(self.archived.iter().map(|i| &i.content))
            .find(|c| c.id == item_id)
    }

    fn refresh_pool_counts(&mut self) {
        let stats = std::mem::take(&mut self.metadata.stats);
        self.metadata.stats = stats.with_pool_counts(&self.active, self.archived.len());
    }
}
