//! Tic-Tac-Toe with an easy random AI and an unbeatable minimax AI

pub mod board;
pub mod minimax;
pub mod state;

pub use board::{Board, Mark, Outcome, WINNING_LINES};
pub use minimax::{best_move, random_move};
pub use state::{TicTacToeDifficulty, TicTacToeMode, TicTacToeState, TicTacToeTimer};
