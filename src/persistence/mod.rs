//! Save data and the save-store collaborator
//!
//! The sim never touches storage. The session loads `SaveData` once at startup and
//! writes it back through a `SaveStore` when the high score moves or a run ends.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::HighScores;
use crate::settings::Settings;

/// Everything that outlives a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub high_score: u64,
    pub leaderboard: HighScores,
    pub settings: Settings,
}

impl SaveData {
    /// Best score on record, from either the counter or the table
    pub fn best_score(&self) -> u64 {
        self.high_score
            .max(self.leaderboard.top_score().unwrap_or(0))
    }

    /// Enter a finished run. Returns its leaderboard rank, if it placed.
    pub fn record_run(&mut self, score: u64, wave: u32, level: u32) -> Option<usize> {
        self.high_score = self.high_score.max(score);
        self.leaderboard.add_score(score, wave, level)
    }
}

/// Errors from a save backend
#[derive(Error, Debug)]
pub enum SaveError {
    /// Reading or writing the backing file failed
    #[error("Save file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data is not valid save JSON
    #[error("Corrupt save data: {0}")]
    Json(#[from] serde_json::Error),

    /// The host offers no storage (private browsing, no window)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Where save data lives
pub trait SaveStore {
    /// Read the save. A store with nothing in it yet returns `SaveData::default()`.
    fn load(&self) -> Result<SaveData, SaveError>;

    fn save(&mut self, data: &SaveData) -> Result<(), SaveError>;
}

/// Store that keeps the save in memory (tests, throwaway sessions)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub data: Option<SaveData>,
    /// Successful writes so far
    pub writes: usize,
    /// Make every operation fail, for exercising fallbacks
    pub broken: bool,
}

impl MemoryStore {
    pub fn with(data: SaveData) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }
}

impl SaveStore for MemoryStore {
    fn load(&self) -> Result<SaveData, SaveError> {
        if self.broken {
            return Err(SaveError::Unavailable("memory store marked broken".into()));
        }
        Ok(self.data.clone().unwrap_or_default())
    }

    fn save(&mut self, data: &SaveData) -> Result<(), SaveError> {
        if self.broken {
            return Err(SaveError::Unavailable("memory store marked broken".into()));
        }
        self.data = Some(data.clone());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_score_uses_table() {
        let mut data = SaveData {
            high_score: 300,
            ..Default::default()
        };
        assert_eq!(data.best_score(), 300);
        data.leaderboard.add_score(900, 4, 1);
        assert_eq!(data.best_score(), 900);
    }

    #[test]
    fn test_record_run() {
        let mut data = SaveData::default();
        assert_eq!(data.record_run(1200, 5, 2), Some(1));
        assert_eq!(data.record_run(0, 1, 1), None);
        assert_eq!(data.high_score, 1200);
        assert_eq!(data.leaderboard.entries.len(), 1);
    }

    #[test]
    fn test_old_saves_still_load() {
        // Bare high score from before the leaderboard existed
        let data: SaveData = serde_json::from_str(r#"{"high_score":4200}"#).unwrap();
        assert_eq!(data.high_score, 4200);
        assert!(data.leaderboard.is_empty());
        assert_eq!(data.settings, Settings::default());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::default();
        assert_eq!(store.load().unwrap(), SaveData::default());
        let data = SaveData {
            high_score: 10,
            ..Default::default()
        };
        store.save(&data).unwrap();
        assert_eq!(store.load().unwrap(), data);
        assert_eq!(store.writes, 1);

        store.broken = true;
        assert!(matches!(store.load(), Err(SaveError::Unavailable(_))));
        assert!(store.save(&data).is_err());
    }
}
