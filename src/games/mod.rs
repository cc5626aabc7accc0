//! Game engines
//!
//! Every engine is a plain struct owning its full state. Inputs are method
//! calls, output is the (serializable) state itself plus a queue of
//! `FeedbackEvent`s. Nothing in here renders, plays audio or reads a device.
//! - Fixed-interval `tick` for the real-time games (Snake, Flyer)
//! - Seeded RNG only
//! - Delayed work goes through a generation-guarded `TimerQueue`

pub mod flyer;
pub mod memory;
pub mod snake;
pub mod tictactoe;

pub use flyer::{FlyerPhase, FlyerState};
pub use memory::{MemoryDifficulty, MemoryPhase, MemoryState};
pub use snake::{Direction, SnakePhase, SnakeSpeed, SnakeState};
pub use tictactoe::{Mark, TicTacToeDifficulty, TicTacToeMode, TicTacToeState};
