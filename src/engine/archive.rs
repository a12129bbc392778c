//! Moves items between the active pool and the archive.
//!
//! Archiving compresses an item: its attempt history is folded into frozen
//! totals. Unarchiving restores the content with fresh progress, so only the
//! totals are lost on the way back.

use chrono::NaiveDate;

use crate::engine::types::{ArchivedItem, Attempt, Item, Mastery};

#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub active: Vec<Item>,
    pub archived: Vec<ArchivedItem>,
    pub archived_count: usize,
}

/// Whole days between two dates, ignoring order.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days().abs()
}

/// True once an item has been mastered for at least `threshold_days`.
/// A mastery date in the future never qualifies.
pub fn is_archive_eligible(item: &Item, threshold_days: u32, today: NaiveDate) -> bool {
    match item.mastery {
        Mastery::Mastered { since } => {
            since <= today && days_between(since, today) >= i64::from(threshold_days)
        }
        Mastery::Learning => false,
    }
}

/// Archives every eligible item. Kept items stay in their original order and
/// archived ones are appended in the order they had in the active pool.
pub fn sweep(
    active: Vec<Item>,
    mut archived: Vec<ArchivedItem>,
    threshold_days: u32,
    today: NaiveDate,
) -> SweepResult {
    let (to_archive, keep): (Vec<Item>, Vec<Item>) = active
        .into_iter()
        .partition(|item| is_archive_eligible(item, threshold_days, today));

    let archived_count = to_archive.len();
    archived.extend(to_archive.into_iter().map(|item| compress(item, today)));

    SweepResult {
        active: keep,
        archived,
        archived_count,
    }
}

pub fn compress(item: Item, today: NaiveDate) -> ArchivedItem {
    let total_attempts = item.attempts.len() as u32;
    let total_correct = item.attempts.iter().filter(|a| a.correct).count() as u32;
    let accuracy = if total_attempts == 0 {
        0.0
    } else {
        f64::from(total_correct) / f64::from(total_attempts)
    };

    ArchivedItem {
        mastered_date: item.mastery.since(),
        content: item.content,
        total_attempts,
        total_correct,
        accuracy,
        archived_date: today,
        last_review_date: None,
        review_failures: 0,
    }
}

/// Rebuilds an active item. The single failed attempt records the review
/// failure that triggered the return.
pub fn decompress(archived: ArchivedItem, today: NaiveDate) -> Item {
    Item {
        content: archived.content,
        attempts: vec![Attempt {
            date: today,
            correct: false,
            response_time_ms: 0,
        }],
        streak: 0,
        mastery: Mastery::Learning,
    }
}

/// Moves an archived item back to the end of the active pool. Returns the
/// restored item, or `None` when the id is not archived.
pub fn unarchive<'a>(
    archived: &mut Vec<ArchivedItem>,
    active: &'a mut Vec<Item>,
    item_id: u64,
    today: NaiveDate,
) -> Option<&'a Item> {
    let idx = archived.iter().position(|i| i.id() == item_id)?;
    let item = archived.remove(idx);
    active.push(decompress(item, today));
    active.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Difficulty, ItemContent};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(id: u64, mastered_on: Option<NaiveDate>) -> Item {
        let mut item = Item::new(ItemContent {
            id,
            term: "Fenster".to_string(),
            article: Some("das".to_string()),
            plural: Some("Fenster".to_string()),
            en: vec!["window".to_string()],
            pt: vec!["janela".to_string()],
            example: "Das Fenster ist offen.".to_string(),
            example_pt: "A janela está aberta.".to_string(),
            level: Some("A2".to_string()),
            difficulty: Difficulty::Hard,
            false_friend: true,
            warning: Some("not 'fenestra'".to_string()),
        });
        if let Some(since) = mastered_on {
            for correct in [false, true, true, true, true, true] {
                item.attempts.push(Attempt {
                    date: since,
                    correct,
                    response_time_ms: 1500,
                });
            }
            item.streak = 5;
            item.mastery = Mastery::Mastered { since };
        }
        item
    }

    #[test]
    fn test_sweep_archives_items_past_threshold() {
        let today = date(2024, 6, 1);
        let active = vec![
            item(1, Some(date(2024, 1, 1))),
            item(2, None),
            item(3, Some(date(2024, 5, 1))),
            item(4, Some(date(2024, 3, 3))),
        ];

        let result = sweep(active, Vec::new(), 90, today);
        assert_eq!(result.archived_count, 2);
        let kept: Vec<u64> = result.active.iter().map(|i| i.id()).collect();
        assert_eq!(kept, vec![2, 3]);
        let moved: Vec<u64> = result.archived.iter().map(|i| i.id()).collect();
        assert_eq!(moved, vec![1, 4]);

        let first = &result.archived[0];
        assert_eq!(first.total_attempts, 6);
        assert_eq!(first.total_correct, 5);
        assert!((first.accuracy - 5.0 / 6.0).abs() < 1e-9);
        assert_eq!(first.archived_date, today);
        assert_eq!(first.mastered_date, Some(date(2024, 1, 1)));
        assert_eq!(first.last_review_date, None);
        assert_eq!(first.review_failures, 0);
    }

    #[test]
    fn test_sweep_threshold_is_inclusive() {
        let today = date(2024, 4, 1);
        let since = today - chrono::Duration::days(90);
        let result = sweep(vec![item(1, Some(since))], Vec::new(), 90, today);
        assert_eq!(result.archived_count, 1);

        let since = today - chrono::Duration::days(89);
        let result = sweep(vec![item(1, Some(since))], Vec::new(), 90, today);
        assert_eq!(result.archived_count, 0);
    }

    #[test]
    fn test_future_mastery_date_is_not_archived() {
        let today = date(2024, 1, 1);
        let result = sweep(vec![item(1, Some(date(2025, 1, 1)))], Vec::new(), 90, today);
        assert_eq!(result.archived_count, 0);
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let today = date(2024, 6, 1);
        let active = vec![item(1, Some(date(2024, 1, 1))), item(2, None)];
        let first = sweep(active, Vec::new(), 90, today);
        let second = sweep(first.active.clone(), first.archived.clone(), 90, today);
        assert_eq!(second.archived_count, 0);
        assert_eq!(second.active, first.active);
        assert_eq!(second.archived, first.archived);
    }

    #[test]
    fn test_compress_guards_empty_history() {
        let mut bare = item(1, None);
        bare.mastery = Mastery::Mastered {
            since: date(2024, 1, 1),
        };
        let archived = compress(bare, date(2024, 6, 1));
        assert_eq!(archived.total_attempts, 0);
        assert_eq!(archived.accuracy, 0.0);
    }

    #[test]
    fn test_unarchive_restores_content_with_fresh_progress() {
        let original = item(1, Some(date(2024, 1, 1)));
        let content = original.content.clone();
        let mut archived = vec![compress(original, date(2024, 6, 1))];
        let mut active = Vec::new();

        let today = date(2024, 7, 1);
        let restored = unarchive(&mut archived, &mut active, 1, today).cloned().unwrap();
        assert_eq!(restored.content, content);
        assert_eq!(restored.streak, 0);
        assert_eq!(restored.mastery, Mastery::Learning);
        assert_eq!(
            restored.attempts,
            vec![Attempt {
                date: today,
                correct: false,
                response_time_ms: 0
            }]
        );
        assert!(archived.is_empty());
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn test_unarchive_unknown_id_leaves_pools_alone() {
        let mut archived = vec![compress(item(1, Some(date(2024, 1, 1))), date(2024, 6, 1))];
        let mut active = vec![item(2, None)];
        assert!(unarchive(&mut archived, &mut active, 9, date(2024, 7, 1)).is_none());
        assert_eq!(archived.len(), 1);
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn test_days_between_ignores_order() {
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 31)), 30);
        assert_eq!(days_between(date(2024, 1, 31), date(2024, 1, 1)), 30);
    }
}
