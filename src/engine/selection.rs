//! Picks the cards for a session from one of the three pools.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::types::{ArchivedItem, Item};

const RECENT_FAILURE_FACTOR: f64 = 3.0;
const LOW_STREAK_FACTOR: f64 = 2.0;
const LOW_STREAK_MAX: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Items still being learned, weighted toward weak ones.
    Practice,
    /// Mastered items that have not been archived yet.
    Review,
    /// Archived items.
    Archive,
}

impl SessionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Practice => "practice",
            Self::Review => "review",
            Self::Archive => "archive",
        }
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling weight of a learning item. Factors compose multiplicatively.
pub fn practice_weight(item: &Item) -> f64 {
    let mut weight = 1.0;

    if item.last_attempt().is_some_and(|a| !a.correct) {
        weight *= RECENT_FAILURE_FACTOR;
    }
    if item.streak > 0 && item.streak <= LOW_STREAK_MAX {
        weight *= LOW_STREAK_FACTOR;
    }

    weight * item.content.difficulty.weight_factor()
}

/// Unmastered items; the whole pool when it fits, otherwise a weighted sample.
pub fn select_for_practice<'a, R: Rng>(
    active: &'a [Item],
    count: usize,
    rng: &mut R,
) -> Vec<&'a Item> {
    let learning: Vec<&Item> = active.iter().filter(|i| !i.mastery.is_mastered()).collect();

    if learning.len() <= count {
        return learning;
    }

    let weighted = learning
        .into_iter()
        .map(|item| (item, practice_weight(item)))
        .collect();
    weighted_sample(weighted, count, rng)
}

/// Mastered items, oldest mastery first.
pub fn select_for_review(active: &[Item], count: usize) -> Vec<&Item> {
    let mut mastered: Vec<(&Item, chrono::NaiveDate)> = active
        .iter()
        .filter_map(|item| item.mastery.since().map(|since| (item, since)))
        .collect();

    mastered.sort_by_key(|(_, since)| *since);
    mastered.into_iter().take(count).map(|(item, _)| item).collect()
}

/// Archived items never reviewed first, then by oldest review.
pub fn select_for_archive_review(archived: &[ArchivedItem], count: usize) -> Vec<&ArchivedItem> {
    let mut sorted: Vec<&ArchivedItem> = archived.iter().collect();
    // None orders before Some, which puts unreviewed items first
    sorted.sort_by_key(|item| item.last_review_date);
    sorted.truncate(count);
    sorted
}

/// Weighted sampling without replacement.
///
/// Each draw walks the remaining buffer subtracting weights from a uniform
/// cursor in `[0, total)` and takes the candidate where the cursor turns
/// non-positive. The taken slot is filled by swapping in the last entry.
pub fn weighted_sample<T, R: Rng>(mut candidates: Vec<(T, f64)>, count: usize, rng: &mut R) -> Vec<T> {
    let mut selected = Vec::with_capacity(count.min(candidates.len()));

    while selected.len() < count && !candidates.is_empty() {
        let total: f64 = candidates.iter().map(|(_, w)| *w).sum();
        let mut cursor = if total > 0.0 {
            rng.random::<f64>() * total
        } else {
            0.0
        };

        let mut picked = candidates.len() - 1;
        for (idx, (_, weight)) in candidates.iter().enumerate() {
            cursor -= *weight;
            if cursor <= 0.0 {
                picked = idx;
                break;
            }
        }

        let (value, _) = candidates.swap_remove(picked);
        selected.push(value);
    }

    selected
}
