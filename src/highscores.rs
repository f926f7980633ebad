//! Finished-attempt leaderboard
//!
//! Receives attempt results from the game loop. Persisted to LocalStorage on
//! web, kept in memory elsewhere. Tracks the top 10 attempts.

use serde::{Deserialize, Serialize};

use crate::platform::ResultSink;
use crate::sim::AttemptResult;

/// Maximum number of entries to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u64,
    pub caught: u32,
    pub missed: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Leaderboard of finished attempts, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreBoard {
    pub entries: Vec<ScoreEntry>,
    /// Attempts recorded, qualifying or not
    #[serde(default)]
    pub attempts_recorded: u32,
}

impl ScoreBoard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "plank_catch_scores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert an attempt if it qualifies.
    /// Returns the rank achieved (1-indexed) or None.
    pub fn add(&mut self, result: &AttemptResult, timestamp: f64) -> Option<usize> {
        self.attempts_recorded += 1;
        if !self.qualifies(result.score) {
            return None;
        }

        let entry = ScoreEntry {
            score: result.score,
            caught: result.stats.caught,
            missed: result.stats.missed,
            timestamp,
        };

        // Ties rank below existing entries
        let pos = self.entries.iter().position(|e| result.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(board) = serde_json::from_str::<ScoreBoard>(&json) {
                    log::info!("Loaded {} scores", board.entries.len());
                    return board;
                }
            }
        }

        log::info!("No scores found, starting fresh");
        Self::new()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

impl ResultSink for ScoreBoard {
    fn attempt_ended(&mut self, result: &AttemptResult) {
        if let Some(rank) = self.add(result, now_ms()) {
            log::info!("Score {} placed #{}", result.score, rank);
        }
        self.save();
    }
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
