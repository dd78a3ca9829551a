use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::app_dirs::AppDirs;

/// Storage key the web version of the game used; kept as the file stem so
/// the persisted data stays recognizable
pub const HIGH_SCORES_KEY: &str = "mordor-high-scores";
pub const MAX_HIGH_SCORES: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    pub date: DateTime<Utc>,
}

/// Persistence seam for the ledger; injected so tests can use an in-memory
/// store instead of the real file
pub trait ScoreStore {
    fn load(&self) -> Vec<HighScoreEntry>;
    fn save(&self, entries: &[HighScoreEntry]) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::scores_path()
            .unwrap_or_else(|| PathBuf::from(format!("{}.json", HIGH_SCORES_KEY)));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore for FileScoreStore {
    /// Missing or malformed content is treated as an empty ledger
    fn load(&self) -> Vec<HighScoreEntry> {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(entries) = serde_json::from_slice::<Vec<HighScoreEntry>>(&bytes) {
                return entries;
            }
        }
        Vec::new()
    }

    fn save(&self, entries: &[HighScoreEntry]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(entries).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

/// In-memory store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    entries: RefCell<Vec<HighScoreEntry>>,
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Vec<HighScoreEntry> {
        self.entries.borrow().clone()
    }

    fn save(&self, entries: &[HighScoreEntry]) -> io::Result<()> {
        *self.entries.borrow_mut() = entries.to_vec();
        Ok(())
    }
}

/// Capped, score-sorted history of past runs. Loaded once at startup and
/// rewritten in full after every accepted submission.
#[derive(Debug)]
pub struct HighScoreLedger<S: ScoreStore> {
    entries: Vec<HighScoreEntry>,
    store: S,
}

impl<S: ScoreStore> HighScoreLedger<S> {
    pub fn load(store: S) -> Self {
        let mut entries = store.load();
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries, store }
    }

    /// Insert, re-sort descending by score (stable, so among equal scores
    /// the newest submission stays first) and truncate. A zero score never
    /// mutates the ledger.
    pub fn submit(&mut self, score: u32, date: DateTime<Utc>) -> io::Result<()> {
        if score == 0 {
            return Ok(());
        }
        let previous = std::mem::take(&mut self.entries);
        self.entries = std::iter::once(HighScoreEntry { score, date })
            .chain(previous)
            .sorted_by(|a, b| b.score.cmp(&a.score))
            .take(MAX_HIGH_SCORES)
            .collect();
        self.store.save(&self.entries)
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }
}
