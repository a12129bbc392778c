//! JSON file persistence for decks.
//!
//! Layout per deck under the data root:
//! - `<deck>/active.json`   `{version, lastUpdated, words: [Item]}`
//! - `<deck>/archived.json` `{version, lastUpdated, words: [ArchivedItem]}`
//! - `<deck>/metadata.json` settings and aggregate statistics
//!
//! Files are always written whole: the payload goes to a temporary sibling
//! which is then renamed over the target, so a failed save leaves the
//! previous file intact. A full deck save stages all three temporaries
//! before the first rename. Renames run in [`SaveOrder`] so that a crash
//! between two of them can duplicate a moved item but never drop it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::engine::types::DATA_VERSION;
use crate::engine::{ArchivedItem, Deck, Item, Metadata};

const ACTIVE_FILE: &str = "active.json";
const ARCHIVED_FILE: &str = "archived.json";
const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unknown deck: {0}")]
    UnknownDeck(String),
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Envelope of the two word files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordFile<T> {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default = "Vec::new")]
    pub words: Vec<T>,
}

impl<T> WordFile<T> {
    pub fn new(words: Vec<T>) -> Self {
        Self {
            version: default_version(),
            last_updated: None,
            words,
        }
    }
}

/// Borrowed form of [`WordFile`] used when writing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WordFileRef<'a, T> {
    version: &'a str,
    last_updated: DateTime<Utc>,
    words: &'a [T],
}

impl<'a, T> WordFileRef<'a, T> {
    fn now(words: &'a [T]) -> Self {
        Self {
            version: DATA_VERSION,
            last_updated: Utc::now(),
            words,
        }
    }
}

/// Which pool file is replaced first when a whole deck is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOrder {
    /// Items moved into the archive: `archived.json` goes first.
    ArchiveFirst,
    /// Items moved back into practice: `active.json` goes first.
    ActiveFirst,
}

/// Full backup of a deck.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckExport {
    pub active: WordFile<Item>,
    pub archived: WordFile<ArchivedItem>,
    pub metadata: Metadata,
    pub export_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DeckStore {
    root: PathBuf,
    decks: Vec<String>,
}

impl DeckStore {
    pub fn new(root: impl Into<PathBuf>, decks: Vec<String>) -> Self {
        Self {
            root: root.into(),
            decks,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn decks(&self) -> &[String] {
        &self.decks
    }

    pub fn has_deck(&self, deck: &str) -> bool {
        self.decks.iter().any(|d| d == deck)
    }

    fn deck_dir(&self, deck: &str) -> StoreResult<PathBuf> {
        if !self.has_deck(deck) {
            return Err(StoreError::UnknownDeck(deck.to_string()));
        }
        Ok(self.root.join(deck))
    }

    fn file_path(&self, deck: &str, file: &str) -> StoreResult<PathBuf> {
        Ok(self.deck_dir(deck)?.join(file))
    }

    /// Creates every deck directory and writes default files that are missing.
    pub async fn init(&self) -> StoreResult<()> {
        let today = Utc::now().date_naive();

        for deck in &self.decks {
            let dir = self.deck_dir(deck)?;
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|source| StoreError::Io {
                    path: dir.clone(),
                    source,
                })?;

            let active = dir.join(ACTIVE_FILE);
            if !exists(&active).await {
                write_json(&active, &WordFileRef::<Item>::now(&[])).await?;
            }

            let archived = dir.join(ARCHIVED_FILE);
            if !exists(&archived).await {
                write_json(&archived, &WordFileRef::<ArchivedItem>::now(&[])).await?;
            }

            let metadata = dir.join(METADATA_FILE);
            if !exists(&metadata).await {
                write_json(&metadata, &Metadata::new(today)).await?;
            }

            tracing::debug!(deck = %deck, path = %dir.display(), "deck storage ready");
        }

        Ok(())
    }

    pub async fn load(&self, deck: &str) -> StoreResult<Deck> {
        Ok(Deck {
            active: self.load_active(deck).await?.words,
            archived: self.load_archived(deck).await?.words,
            metadata: self.load_metadata(deck).await?,
        })
    }

    pub async fn load_active(&self, deck: &str) -> StoreResult<WordFile<Item>> {
        read_json(&self.file_path(deck, ACTIVE_FILE)?).await
    }

    pub async fn load_archived(&self, deck: &str) -> StoreResult<WordFile<ArchivedItem>> {
        read_json(&self.file_path(deck, ARCHIVED_FILE)?).await
    }

    pub async fn load_metadata(&self, deck: &str) -> StoreResult<Metadata> {
        read_json(&self.file_path(deck, METADATA_FILE)?).await
    }

    pub async fn save_active(&self, deck: &str, words: &[Item]) -> StoreResult<()> {
        write_json(&self.file_path(deck, ACTIVE_FILE)?, &WordFileRef::now(words)).await
    }

    pub async fn save_archived(&self, deck: &str, words: &[ArchivedItem]) -> StoreResult<()> {
        write_json(&self.file_path(deck, ARCHIVED_FILE)?, &WordFileRef::now(words)).await
    }

    pub async fn save_metadata(&self, deck: &str, metadata: &Metadata) -> StoreResult<()> {
        write_json(&self.file_path(deck, METADATA_FILE)?, metadata).await
    }

    /// Writes both pools and the metadata. Nothing is replaced unless all
    /// three payloads were staged; metadata is always replaced last.
    pub async fn save(&self, deck: &str, data: &Deck, order: SaveOrder) -> StoreResult<()> {
        let active_path = self.file_path(deck, ACTIVE_FILE)?;
        let archived_path = self.file_path(deck, ARCHIVED_FILE)?;
        let metadata_path = self.file_path(deck, METADATA_FILE)?;

        let active = (
            encode(&active_path, &WordFileRef::now(&data.active))?,
            active_path,
        );
        let archived = (
            encode(&archived_path, &WordFileRef::now(&data.archived))?,
            archived_path,
        );
        let metadata = (encode(&metadata_path, &data.metadata)?, metadata_path);

        let files = match order {
            SaveOrder::ArchiveFirst => vec![archived, active, metadata],
            SaveOrder::ActiveFirst => vec![active, archived, metadata],
        };
        replace_all(files).await
    }

    pub async fn export(&self, deck: &str) -> StoreResult<DeckExport> {
        Ok(DeckExport {
            active: self.load_active(deck).await?,
            archived: self.load_archived(deck).await?,
            metadata: self.load_metadata(deck).await?,
            export_date: Utc::now(),
        })
    }
}

fn default_version() -> String {
    DATA_VERSION.to_string()
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

fn tmp_path(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

fn encode<T: Serialize>(path: &Path, value: &T) -> StoreResult<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let bytes = tokio::fs::read(path).await.map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let payload = encode(path, value)?;
    replace_all(vec![(payload, path.to_path_buf())]).await
}

/// Stages every payload next to its target, then renames them in order.
/// On failure the temporaries not yet renamed are removed.
async fn replace_all(files: Vec<(Vec<u8>, PathBuf)>) -> StoreResult<()> {
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());

    for (payload, path) in files {
        let tmp = tmp_path(&path);
        if let Err(source) = tokio::fs::write(&tmp, &payload).await {
            discard(&staged).await;
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::Io { path: tmp, source });
        }
        staged.push((tmp, path));
    }

    for (idx, (tmp, path)) in staged.iter().enumerate() {
        if let Err(source) = tokio::fs::rename(tmp, path).await {
            discard(&staged[idx..]).await;
            if idx > 0 {
                tracing::warn!(path = %path.display(), replaced = idx, "deck save stopped after partial replace");
            }
            return Err(StoreError::Io {
                path: path.clone(),
                source,
            });
        }
    }

    Ok(())
}

async fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        let _ = tokio::fs::remove_file(tmp).await;
    }
}
