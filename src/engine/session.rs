use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::engine::selection::SessionMode;
use crate::engine::types::{ArchivedItem, Item, ItemContent};

/// A card dealt into a session. Archive-review sessions deal archived items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SessionCard {
    Active(Item),
    Archived(ArchivedItem),
}

impl SessionCard {
    pub fn id(&self) -> u64 {
        self.content().id
    }

    pub fn content(&self) -> &ItemContent {
        match self {
            Self::Active(item) => &item.content,
            Self::Archived(item) => &item.content,
        }
    }
}

/// One practice round. Lives only until its results are folded into
/// [`SessionStats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub mode: SessionMode,
    pub cards: Vec<SessionCard>,
    results: Vec<bool>,
}

impl Session {
    pub fn new(mode: SessionMode, cards: Vec<SessionCard>) -> Self {
        let results = Vec::with_capacity(cards.len());
        Self {
            mode,
            cards,
            results,
        }
    }

    pub fn current_card(&self) -> Option<&SessionCard> {
        self.cards.get(self.results.len())
    }

    /// Stores the answer for the current card. Returns the answered card, or
    /// `None` once every card has a result.
    pub fn record(&mut self, correct: bool) -> Option<&SessionCard> {
        let idx = self.results.len();
        if idx >= self.cards.len() {
            return None;
        }
        self.results.push(correct);
        self.cards.get(idx)
    }

    pub fn results(&self) -> &[bool] {
        &self.results
    }

    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| **r).count()
    }

    pub fn is_complete(&self) -> bool {
        self.results.len() == self.cards.len()
    }
}

/// Aggregate statistics persisted in deck metadata.
///
/// `currentStreak` and `longestStreak` count consecutive calendar days with
/// at least one finished session. `averageSessionTime` is the mean duration
/// in milliseconds over the sessions that reported one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionStats {
    pub total_words: usize,
    pub active_words: usize,
    pub memorized_words: usize,
    pub archived_words: usize,
    pub start_date: Option<NaiveDate>,
    pub total_sessions: u64,
    pub total_cards: u64,
    pub overall_accuracy: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_session_date: Option<NaiveDate>,
    pub average_session_time: u64,
    pub timed_sessions: u64,
}

/// One finished session as reported by the client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionResult<'a> {
    pub results: &'a [bool],
    pub duration_ms: Option<u64>,
    pub date: NaiveDate,
}

impl SessionStats {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            ..Self::default()
        }
    }

    /// Folds one finished session into the running totals.
    pub fn fold(&self, session: SessionResult<'_>, active: &[Item], archived_len: usize) -> Self {
        let correct = session.results.iter().filter(|r| **r).count() as u64;
        let cards = session.results.len() as u64;
        let total_cards = self.total_cards + cards;

        let overall_accuracy = if total_cards == 0 {
            self.overall_accuracy
        } else {
            (self.overall_accuracy * self.total_cards as f64 + correct as f64) / total_cards as f64
        };

        let (average_session_time, timed_sessions) = match session.duration_ms {
            Some(ms) => {
                let timed = self.timed_sessions + 1;
                let total = self.average_session_time as f64 * self.timed_sessions as f64 + ms as f64;
                ((total / timed as f64).round() as u64, timed)
            }
            None => (self.average_session_time, self.timed_sessions),
        };

        let current_streak = self.day_streak_on(session.date);

        Self {
            total_sessions: self.total_sessions + 1,
            total_cards,
            overall_accuracy,
            current_streak,
            longest_streak: self.longest_streak.max(current_streak),
            last_session_date: Some(
                self.last_session_date
                    .map_or(session.date, |last| last.max(session.date)),
            ),
            average_session_time,
            timed_sessions,
            ..self.clone()
        }
        .with_pool_counts(active, archived_len)
    }

    /// Day streak after practising on `date`.
    fn day_streak_on(&self, date: NaiveDate) -> u32 {
        match self.last_session_date {
            Some(last) if last >= date => self.current_streak.max(1),
            Some(last) if last + Duration::days(1) == date => self.current_streak + 1,
            _ => 1,
        }
    }

    pub fn with_pool_counts(mut self, active: &[Item], archived_len: usize) -> Self {
        self.active_words = active.len();
        self.memorized_words = active.iter().filter(|i| i.mastery.is_mastered()).count();
        self.archived_words = archived_len;
        self.total_words = self.active_words + self.archived_words;
        self
    }
}

/// Dashboard summary of a deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    pub total: usize,
    pub active: usize,
    pub learning: usize,
    pub memorized: usize,
    pub archived: usize,
    pub total_attempts: usize,
    pub accuracy: f64,
    pub total_sessions: u64,
    pub overall_accuracy: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub average_session_time: u64,
}

impl LearningStats {
    pub fn collect(active: &[Item], archived_len: usize, stats: &SessionStats) -> Self {
        let memorized = active.iter().filter(|i| i.mastery.is_mastered()).count();
        let total_attempts: usize = active.iter().map(|i| i.attempts.len()).sum();
        let total_correct = active
            .iter()
            .flat_map(|i| i.attempts.iter())
            .filter(|a| a.correct)
            .count();

        Self {
            total: active.len() + archived_len,
            active: active.len(),
            learning: active.len() - memorized,
            memorized,
            archived: archived_len,
            total_attempts,
            accuracy: if total_attempts > 0 {
                total_correct as f64 / total_attempts as f64
            } else {
                0.0
            },
            total_sessions: stats.total_sessions,
            overall_accuracy: stats.overall_accuracy,
            current_streak: stats.current_streak,
            longest_streak: stats.longest_streak,
            average_session_time: stats.average_session_time,
        }
    }
}
