//! Streak and mastery bookkeeping for answered cards.

use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::archive;
use crate::engine::types::{ArchivedItem, Attempt, Item, Mastery, MASTERY_STREAK};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MasteryChange {
    Unchanged,
    Gained,
    Revoked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum AttemptOutcome {
    /// The id is not in the active pool, usually a stale selection.
    Ignored,
    Recorded { streak: u32, change: MasteryChange },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum ArchiveReviewOutcome {
    Ignored,
    #[serde(rename_all = "camelCase")]
    Kept { review_failures: u32 },
    Unarchived,
}

/// Appends an attempt to an active item and advances its streak and mastery.
pub fn record_attempt(
    active: &mut [Item],
    item_id: u64,
    correct: bool,
    response_time_ms: u64,
    today: NaiveDate,
) -> AttemptOutcome {
    let Some(item) = active.iter_mut().find(|i| i.id() == item_id) else {
        return AttemptOutcome::Ignored;
    };

    item.attempts.push(Attempt {
        date: today,
        correct,
        response_time_ms,
    });

    let change = if correct {
        item.streak += 1;
        if item.streak >= MASTERY_STREAK && !item.mastery.is_mastered() {
            item.mastery = Mastery::Mastered { since: today };
            MasteryChange::Gained
        } else {
            MasteryChange::Unchanged
        }
    } else {
        item.streak = 0;
        if item.mastery.is_mastered() {
            item.mastery = Mastery::Learning;
            MasteryChange::Revoked
        } else {
            MasteryChange::Unchanged
        }
    };

    AttemptOutcome::Recorded {
        streak: item.streak,
        change,
    }
}

/// Records a review of an archived item. Failures accumulate until a correct
/// answer resets them; reaching `failure_threshold` sends the item back to
/// the active pool. Streak and mastery are never touched here.
pub fn record_archive_review_attempt(
    archived: &mut Vec<ArchivedItem>,
    active: &mut Vec<Item>,
    item_id: u64,
    correct: bool,
    failure_threshold: u32,
    today: NaiveDate,
) -> ArchiveReviewOutcome {
    let Some(item) = archived.iter_mut().find(|i| i.id() == item_id) else {
        return ArchiveReviewOutcome::Ignored;
    };

    item.last_review_date = Some(today);

    if correct {
        item.review_failures = 0;
        return ArchiveReviewOutcome::Kept { review_failures: 0 };
    }

    item.review_failures += 1;
    if item.review_failures >= failure_threshold {
        archive::unarchive(archived, active, item_id, today);
        return ArchiveReviewOutcome::Unarchived;
    }

    ArchiveReviewOutcome::Kept {
        review_failures: item.review_failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Difficulty, ItemContent};

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, n).unwrap()
    }

    fn content(id: u64) -> ItemContent {
        ItemContent {
            id,
            term: "Baum".to_string(),
            article: Some("der".to_string()),
            plural: Some("Bäume".to_string()),
            en: vec!["tree".to_string()],
            pt: vec!["árvore".to_string()],
            example: "Der Baum ist alt.".to_string(),
            example_pt: "A árvore é velha.".to_string(),
            level: Some("A1".to_string()),
            difficulty: Difficulty::Easy,
            false_friend: false,
            warning: None,
        }
    }

    fn archived(id: u64) -> ArchivedItem {
        ArchivedItem {
            content: content(id),
            total_attempts: 6,
            total_correct: 5,
            accuracy: 5.0 / 6.0,
            mastered_date: Some(day(1)),
            archived_date: day(2),
            last_review_date: None,
            review_failures: 0,
        }
    }

    #[test]
    fn test_five_correct_answers_master_the_item() {
        let mut pool = vec![Item::new(content(1))];
        for n in 1..=4 {
            let outcome = record_attempt(&mut pool, 1, true, 800, day(n));
            assert_eq!(
                outcome,
                AttemptOutcome::Recorded {
                    streak: n,
                    change: MasteryChange::Unchanged
                }
            );
        }
        let outcome = record_attempt(&mut pool, 1, true, 800, day(5));
        assert_eq!(
            outcome,
            AttemptOutcome::Recorded {
                streak: 5,
                change: MasteryChange::Gained
            }
        );
        assert_eq!(pool[0].mastery, Mastery::Mastered { since: day(5) });
        assert_eq!(pool[0].attempts.len(), 5);

        // further correct answers keep the original date
        record_attempt(&mut pool, 1, true, 800, day(6));
        assert_eq!(pool[0].mastery, Mastery::Mastered { since: day(5) });
        assert_eq!(pool[0].streak, 6);
    }

    #[test]
    fn test_lapse_revokes_mastery() {
        let mut pool = vec![Item::new(content(1))];
        for n in 1..=5 {
            record_attempt(&mut pool, 1, true, 500, day(n));
        }
        let outcome = record_attempt(&mut pool, 1, false, 3000, day(6));
        assert_eq!(
            outcome,
            AttemptOutcome::Recorded {
                streak: 0,
                change: MasteryChange::Revoked
            }
        );
        assert_eq!(pool[0].mastery, Mastery::Learning);
        assert_eq!(pool[0].streak, 0);
        assert!(!pool[0].attempts.last().unwrap().correct);
    }

    #[test]
    fn test_unknown_item_is_ignored() {
        let mut pool = vec![Item::new(content(1))];
        let before = pool.clone();
        assert_eq!(
            record_attempt(&mut pool, 99, true, 100, day(1)),
            AttemptOutcome::Ignored
        );
        assert_eq!(pool, before);
    }

    #[test]
    fn test_archive_review_failures_unarchive_at_threshold() {
        let mut archived_pool = vec![archived(1), archived(2)];
        let mut active = Vec::new();

        let first = record_archive_review_attempt(&mut archived_pool, &mut active, 1, false, 2, day(10));
        assert_eq!(first, ArchiveReviewOutcome::Kept { review_failures: 1 });
        assert_eq!(archived_pool[0].last_review_date, Some(day(10)));

        let second = record_archive_review_attempt(&mut archived_pool, &mut active, 1, false, 2, day(11));
        assert_eq!(second, ArchiveReviewOutcome::Unarchived);
        assert_eq!(archived_pool.len(), 1);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].streak, 0);
        assert_eq!(active[0].mastery, Mastery::Learning);
    }

    #[test]
    fn test_correct_review_resets_failures() {
        let mut archived_pool = vec![archived(1)];
        let mut active = Vec::new();

        record_archive_review_attempt(&mut archived_pool, &mut active, 1, false, 2, day(10));
        let outcome = record_archive_review_attempt(&mut archived_pool, &mut active, 1, true, 2, day(11));
        assert_eq!(outcome, ArchiveReviewOutcome::Kept { review_failures: 0 });
        assert_eq!(archived_pool[0].review_failures, 0);

        let outcome = record_archive_review_attempt(&mut archived_pool, &mut active, 1, false, 2, day(12));
        assert_eq!(outcome, ArchiveReviewOutcome::Kept { review_failures: 1 });
        assert!(active.is_empty());
    }

    #[test]
    fn test_unknown_archived_item_is_ignored() {
        let mut archived_pool = vec![archived(1)];
        let mut active = Vec::new();
        let outcome = record_archive_review_attempt(&mut archived_pool, &mut active, 5, false, 2, day(1));
        assert_eq!(outcome, ArchiveReviewOutcome::Ignored);
        assert_eq!(archived_pool[0].last_review_date, None);
    }
}
