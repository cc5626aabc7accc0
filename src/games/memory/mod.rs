//! Memory Match: flip pairs of cards until every symbol is matched

pub mod deck;
pub mod state;

pub use deck::{Card, SYMBOLS, build_deck};
pub use state::{MemoryDifficulty, MemoryPhase, MemoryState, MemoryTimer};
