//! Move selection for the computer player
//!
//! Hard plays plain exhaustive minimax: a win for the AI scores +10, a loss
//! -10, a draw 0. Search depth does not discount scores, so among equally
//! good moves the lowest index is kept.

use rand::Rng;

use super::board::{Board, Mark};

const WIN_SCORE: i32 = 10;

/// Best cell for `ai` to play, or None on a full board
pub fn best_move(board: &Board, ai: Mark) -> Option<usize> {
    let mut scratch = *board;
    let mut best: Option<(usize, i32)> = None;

    for cell in board.empty_cells() {
        scratch.set(cell, Some(ai));
        let score = minimax(&mut scratch, ai, ai.other());
        scratch.set(cell, None);

        // Strictly greater keeps the first best cell
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((cell, score));
        }
    }
    best.map(|(cell, _)| cell)
}

/// Score of `board` for `ai` with `to_move` playing next
fn minimax(board: &mut Board, ai: Mark, to_move: Mark) -> i32 {
    if let Some((winner, _)) = board.winner() {
        return if winner == ai { WIN_SCORE } else { -WIN_SCORE };
    }
    if board.is_full() {
        return 0;
    }

    let maximizing = to_move == ai;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for cell in 0..board.cells.len() {
        if board.get(cell).is_some() {
            continue;
        }
        board.set(cell, Some(to_move));
        let score = minimax(board, ai, to_move.other());
        board.set(cell, None);
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    best
}

/// Uniform choice among the empty cells
pub fn random_move<R: Rng>(board: &Board, rng: &mut R) -> Option<usize> {
    let empty: Vec<usize> = board.empty_cells().collect();
    if empty.is_empty() {
        return None;
    }
    Some(empty[rng.random_range(0..empty.len())])
}
