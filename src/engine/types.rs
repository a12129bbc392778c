use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::session::SessionStats;

/// Consecutive correct answers needed before an item counts as mastered.
pub const MASTERY_STREAK: u32 = 5;

pub const DATA_VERSION: &str = "1.0";

/// Difficulty tier, stored as 1 (easy), 2 (medium) or 3 (hard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn weight_factor(self) -> f64 {
        match self {
            Self::Easy => 0.5,
            Self::Medium => 1.0,
            Self::Hard => 2.0,
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Easy),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Hard),
            other => Err(format!("difficulty must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(value: Difficulty) -> Self {
        match value {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

/// Static content of a vocabulary entry. Shared verbatim by active and
/// archived items, so archiving never touches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemContent {
    pub id: u64,
    #[serde(rename = "de", alias = "term")]
    pub term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    #[serde(default)]
    pub en: Vec<String>,
    #[serde(default)]
    pub pt: Vec<String>,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub example_pt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub false_friend: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub date: NaiveDate,
    pub correct: bool,
    #[serde(rename = "ms", alias = "responseTimeMs", default)]
    pub response_time_ms: u64,
}

/// Mastery of an active item. A date only exists while mastered, so a revoked
/// mastery cannot leave a stale date behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "MasteryRecord", into = "MasteryRecord")]
pub enum Mastery {
    #[default]
    Learning,
    Mastered { since: NaiveDate },
}

impl Mastery {
    pub fn is_mastered(&self) -> bool {
        matches!(self, Self::Mastered { .. })
    }

    pub fn since(&self) -> Option<NaiveDate> {
        match self {
            Self::Learning => None,
            Self::Mastered { since } => Some(*since),
        }
    }
}

/// On-disk shape of [`Mastery`]: the `memorized` flag plus its date.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MasteryRecord {
    #[serde(rename = "memorized", alias = "mastered", default)]
    memorized: bool,
    #[serde(rename = "memorizedDate", alias = "masteredDate", default)]
    memorized_date: Option<NaiveDate>,
}

impl From<MasteryRecord> for Mastery {
    fn from(record: MasteryRecord) -> Self {
        match (record.memorized, record.memorized_date) {
            (true, Some(since)) => Self::Mastered { since },
            // a flag without a date cannot be placed on the archive timeline
            _ => Self::Learning,
        }
    }
}

impl From<Mastery> for MasteryRecord {
    fn from(mastery: Mastery) -> Self {
        Self {
            memorized: mastery.is_mastered(),
            memorized_date: mastery.since(),
        }
    }
}

/// An item in the active pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(flatten)]
    pub content: ItemContent,
    #[serde(default)]
    pub attempts: Vec<Attempt>,
    #[serde(default)]
    pub streak: u32,
    #[serde(flatten)]
    pub mastery: Mastery,
}

impl Item {
    pub fn new(content: ItemContent) -> Self {
        Self {
            content,
            attempts: Vec::new(),
            streak: 0,
            mastery: Mastery::Learning,
        }
    }

    pub fn id(&self) -> u64 {
        self.content.id
    }

    pub fn last_attempt(&self) -> Option<&Attempt> {
        self.attempts.last()
    }
}

/// Compressed projection of an [`Item`] held in the archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedItem {
    #[serde(flatten)]
    pub content: ItemContent,
    pub total_attempts: u32,
    pub total_correct: u32,
    pub accuracy: f64,
    #[serde(rename = "memorizedDate", alias = "masteredDate", default)]
    pub mastered_date: Option<NaiveDate>,
    pub archived_date: NaiveDate,
    #[serde(default)]
    pub last_review_date: Option<NaiveDate>,
    #[serde(default)]
    pub review_failures: u32,
}

impl ArchivedItem {
    pub fn id(&self) -> u64 {
        self.content.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub archive_threshold_days: u32,
    pub review_interval: u32,
    pub session_length: usize,
    pub review_session_length: usize,
    pub unarchive_failure_threshold: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            archive_threshold_days: 90,
            review_interval: 30,
            session_length: 15,
            review_session_length: 10,
            unarchive_failure_threshold: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub stats: SessionStats,
    #[serde(default)]
    pub last_archive_check: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_backup: Option<DateTime<Utc>>,
}

impl Metadata {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            version: default_version(),
            settings: Settings::default(),
            stats: SessionStats::new(start_date),
            last_archive_check: None,
            last_backup: None,
        }
    }
}

fn default_version() -> String {
    DATA_VERSION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_reads_stored_shape() {
        let raw = r#"{
            "id": 7, "de": "Hund", "article": "der", "plural": "Hunde",
            "en": ["dog"], "pt": ["cão", "cachorro"],
            "example": "Der Hund bellt.", "examplePt": "O cão ladra.",
            "level": "A1", "difficulty": 3, "falseFriend": false,
            "attempts": [{"date": "2024-03-01", "correct": true, "ms": 1200}],
            "streak": 5, "memorized": true, "memorizedDate": "2024-03-02"
        }"#;
        let item: Item = serde_json::from_str(raw).unwrap();
        assert_eq!(item.content.term, "Hund");
        assert_eq!(item.content.difficulty, Difficulty::Hard);
        assert_eq!(item.attempts[0].response_time_ms, 1200);
        assert_eq!(
            item.mastery,
            Mastery::Mastered {
                since: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
            }
        );

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["memorized"], true);
        assert_eq!(value["memorizedDate"], "2024-03-02");
        assert_eq!(value["de"], "Hund");
    }

    #[test]
    fn mastered_flag_without_date_reads_as_learning() {
        let raw = r#"{"id": 1, "de": "Haus", "memorized": true, "memorizedDate": null}"#;
        let item: Item = serde_json::from_str(raw).unwrap();
        assert_eq!(item.mastery, Mastery::Learning);
        assert_eq!(item.streak, 0);
    }

    #[test]
    fn difficulty_rejects_unknown_tier() {
        let raw = r#"{"id": 1, "de": "Haus", "difficulty": 9}"#;
        assert!(serde_json::from_str::<Item>(raw).is_err());
    }

    #[test]
    fn settings_fill_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{"sessionLength": 20}"#).unwrap();
        assert_eq!(settings.session_length, 20);
        assert_eq!(settings.archive_threshold_days, 90);
        assert_eq!(settings.unarchive_failure_threshold, 2);
    }
}
