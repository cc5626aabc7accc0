//! Best-score-per-game record
//!
//! Persisted as one JSON object, one slot per game. Memory counts moves so
//! lower wins there; every other game keeps its highest value. 0 means unset.

use serde::{Deserialize, Serialize};

use crate::error::{ArcadeError, Result};
use crate::persistence::KeyValueStorage;

/// The closed set of games in the arcade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Memory,
    Snake,
    TicTacToe,
    Flyer,
}

impl GameId {
    pub const ALL: [GameId; 4] = [GameId::Memory, GameId::Snake, GameId::TicTacToe, GameId::Flyer];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Memory => "memory",
            GameId::Snake => "snake",
            GameId::TicTacToe => "tictactoe",
            GameId::Flyer => "flyer",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(GameId::Memory),
            "snake" => Ok(GameId::Snake),
            "tictactoe" | "tic-tac-toe" => Ok(GameId::TicTacToe),
            "flyer" | "flappy" => Ok(GameId::Flyer),
            _ => Err(ArcadeError::UnknownGame(s.to_string())),
        }
    }

    /// Which direction counts as an improvement for this game
    pub fn policy(&self) -> ScorePolicy {
        match self {
            GameId::Memory => ScorePolicy::LowerIsBetter,
            _ => ScorePolicy::HigherIsBetter,
        }
    }
}

/// Record comparison direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorePolicy {
    HigherIsBetter,
    LowerIsBetter,
}

impl ScorePolicy {
    /// Whether `candidate` beats `best` (0 is the unset sentinel)
    pub fn improves(&self, best: u64, candidate: u64) -> bool {
        match self {
            ScorePolicy::HigherIsBetter => candidate > best,
            // A zero candidate would read back as "unset"
            ScorePolicy::LowerIsBetter => candidate > 0 && (best == 0 || candidate < best),
        }
    }
}

/// Persisted layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRecord {
    pub memory: u64,
    pub snake: u64,
    pub tictactoe: u64,
    pub flyer: u64,
}

impl ScoreRecord {
    fn slot(&self, game: GameId) -> u64 {
        match game {
            GameId::Memory => self.memory,
            GameId::Snake => self.snake,
            GameId::TicTacToe => self.tictactoe,
            GameId::Flyer => self.flyer,
        }
    }

    fn slot_mut(&mut self, game: GameId) -> &mut u64 {
        match game {
            GameId::Memory => &mut self.memory,
            GameId::Snake => &mut self.snake,
            GameId::TicTacToe => &mut self.tictactoe,
            GameId::Flyer => &mut self.flyer,
        }
    }
}

/// What the engines need from the score store
pub trait Scoreboard {
    /// Current best (0 if unset)
    fn best(&self, game: GameId) -> u64;

    /// Offer a finished-run score; returns true if it became the new record
    fn submit(&mut self, game: GameId, candidate: u64) -> bool;

    /// Count one more win
    fn record_win(&mut self, game: GameId) -> u64 {
        let wins = self.best(game) + 1;
        self.submit(game, wins);
        wins
    }
}

/// Durable score store
#[derive(Debug)]
pub struct ScoreStore<S: KeyValueStorage> {
    storage: S,
    scores: ScoreRecord,
    /// False once the backend failed; scores are then kept for the session only
    persistent: bool,
}

impl<S: KeyValueStorage> ScoreStore<S> {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "neon_arcade_scores";

    /// Load scores from storage, defaulting every game to 0 on absent or corrupt data
    pub fn load(storage: S) -> Self {
        let mut persistent = true;
        let scores = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<ScoreRecord>(&json) {
                Ok(scores) => {
                    log::info!("Loaded scores: {:?}", scores);
                    scores
                }
                Err(e) => {
                    log::warn!("Stored scores unreadable ({}), starting fresh", e);
                    ScoreRecord::default()
                }
            },
            Ok(None) => {
                log::info!("No scores found, starting fresh");
                ScoreRecord::default()
            }
            Err(e) => {
                log::warn!("{} - scores kept in memory only", e);
                persistent = false;
                ScoreRecord::default()
            }
        };

        Self {
            storage,
            scores,
            persistent,
        }
    }

    pub fn get(&self, game: GameId) -> u64 {
        self.scores.slot(game)
    }

    /// Offer a score; on a new record the whole record is written immediately
    pub fn update(&mut self, game: GameId, candidate: u64) -> bool {
        let best = self.scores.slot(game);
        if !game.policy().improves(best, candidate) {
            return false;
        }

        *self.scores.slot_mut(game) = candidate;
        log::info!("New {} record: {} (was {})", game.as_str(), candidate, best);
        self.save();
        true
    }

    /// Every game's best for a stats panel; `None` for unset
    pub fn all(&self) -> Vec<(GameId, Option<u64>)> {
        GameId::ALL
            .iter()
            .map(|&game| {
                let value = self.scores.slot(game);
                // Zero is a real result for higher-is-better games
                let shown = match game.policy() {
                    ScorePolicy::HigherIsBetter => Some(value),
                    ScorePolicy::LowerIsBetter => (value > 0).then_some(value),
                };
                (game, shown)
            })
            .collect()
    }

    /// Whether writes currently reach durable storage
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn record(&self) -> &ScoreRecord {
        &self.scores
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Shared backend for other keys (the theme)
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    fn save(&mut self) {
        if !self.persistent {
            return;
        }
        let json = match serde_json::to_string(&self.scores) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not serialize scores: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set_item(Self::STORAGE_KEY, &json) {
            log::warn!("{} - scores kept in memory only", e);
            self.persistent = false;
        }
    }
}

impl<S: KeyValueStorage> Scoreboard for ScoreStore<S> {
    fn best(&self, game: GameId) -> u64 {
        self.get(game)
    }

    fn submit(&mut self, game: GameId, candidate: u64) -> bool {
        self.update(game, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStorage, UnavailableStorage};

    type Store = ScoreStore<MemoryStorage>;

    #[test]
    fn test_memory_lower_is_better() {
        let mut store = Store::load(MemoryStorage::new());
        assert!(store.update(GameId::Memory, 5));
        assert!(store.update(GameId::Memory, 3));
        assert_eq!(store.get(GameId::Memory), 3);
        assert!(!store.update(GameId::Memory, 4));
        assert_eq!(store.get(GameId::Memory), 3);
    }

    #[test]
    fn test_snake_higher_is_better() {
        let mut store = Store::load(MemoryStorage::new());
        assert!(store.update(GameId::Snake, 10));
        assert!(!store.update(GameId::Snake, 7));
        assert_eq!(store.get(GameId::Snake), 10);
    }

    #[test]
    fn test_zero_never_a_record() {
        let mut store = Store::load(MemoryStorage::new());
        assert!(!store.update(GameId::Flyer, 0));
        assert!(!store.update(GameId::Memory, 0));
    }

    #[test]
    fn test_update_persists_immediately() {
        let mut store = Store::load(MemoryStorage::new());
        store.update(GameId::Flyer, 12);
        let raw = store.storage().raw(Store::STORAGE_KEY).unwrap();
        let parsed: ScoreRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.flyer, 12);

        // Reload sees the write
        let reloaded = Store::load(store.storage().clone());
        assert_eq!(reloaded.get(GameId::Flyer), 12);
    }

    #[test]
    fn test_layout_is_one_object() {
        let mut store = Store::load(MemoryStorage::new());
        store.update(GameId::TicTacToe, 2);
        let raw = store.storage().raw(Store::STORAGE_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(raw).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert_eq!(obj["tictactoe"], 2);
        assert_eq!(obj["memory"], 0);
    }

    #[test]
    fn test_corrupt_and_partial_data_default() {
        let store = Store::load(MemoryStorage::with_item(Store::STORAGE_KEY, "{not json"));
        assert_eq!(*store.record(), ScoreRecord::default());
        assert!(store.is_persistent());

        let store = Store::load(MemoryStorage::with_item(Store::STORAGE_KEY, r#"{"snake":9}"#));
        assert_eq!(store.get(GameId::Snake), 9);
        assert_eq!(store.get(GameId::Memory), 0);
    }

    #[test]
    fn test_unavailable_storage_degrades() {
        let mut store = ScoreStore::load(UnavailableStorage);
        assert!(!store.is_persistent());
        assert!(store.update(GameId::Snake, 4));
        assert_eq!(store.get(GameId::Snake), 4);
    }

    #[test]
    fn test_record_win_counts_every_win() {
        let mut store = Store::load(MemoryStorage::new());
        assert_eq!(store.record_win(GameId::TicTacToe), 1);
        assert_eq!(store.record_win(GameId::TicTacToe), 2);
        assert_eq!(store.get(GameId::TicTacToe), 2);
    }

    #[test]
    fn test_all_reports_unset_memory() {
        let mut store = Store::load(MemoryStorage::new());
        store.update(GameId::Snake, 3);
        let all = store.all();
        assert!(all.contains(&(GameId::Memory, None)));
        assert!(all.contains(&(GameId::Snake, Some(3))));
        assert!(all.contains(&(GameId::Flyer, Some(0))));
    }

    #[test]
    fn test_game_id_parsing() {
        assert_eq!(GameId::from_str("TicTacToe").unwrap(), GameId::TicTacToe);
        assert_eq!(GameId::from_str("flappy").unwrap(), GameId::Flyer);
        assert!(matches!(GameId::from_str("pong"), Err(ArcadeError::UnknownGame(_))));
    }
}
