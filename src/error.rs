//! Error taxonomy
//!
//! Nothing here is fatal: illegal input is ignored by callers and storage
//! failures degrade to in-memory tracking.

use thiserror::Error;

/// Why a Tic-Tac-Toe move was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("cell {0} is outside the board")]
    OutOfRange(usize),
    #[error("cell {0} is already taken")]
    Occupied(usize),
    #[error("the game is over")]
    GameOver,
    #[error("waiting for the computer to move")]
    NotYourTurn,
}

#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown game '{0}'")]
    UnknownGame(String),

    #[error("unknown {kind} option '{value}'")]
    UnknownOption { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ArcadeError>;
