//! 3x3 board, marks and line detection

use serde::Serialize;

/// Cells are indexed row-major, 0..9
pub const CELL_COUNT: usize = 9;

/// Every line of three: rows, columns, diagonals
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(&self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// State of a finished or ongoing board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Active,
    Won { mark: Mark, line: [usize; 3] },
    Draw,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Board {
    pub cells: [Option<Mark>; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, cell: usize) -> Option<Mark> {
        self.cells.get(cell).copied().flatten()
    }

    /// Caller checks range and occupancy
    pub(crate) fn set(&mut self, cell: usize, mark: Option<Mark>) {
        self.cells[cell] = mark;
    }

    pub fn is_empty_at(&self, cell: usize) -> bool {
        cell < CELL_COUNT && self.cells[cell].is_none()
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        (0..CELL_COUNT).filter(|&i| self.cells[i].is_none())
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|c| **c == Some(mark)).count()
    }

    /// First completed line in `WINNING_LINES` order
    pub fn winner(&self) -> Option<(Mark, [usize; 3])> {
        WINNING_LINES.iter().find_map(|&line| {
            let [a, b, c] = line;
            match self.cells[a] {
                Some(mark) if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) => {
                    Some((mark, line))
                }
                _ => None,
            }
        })
    }

    pub fn outcome(&self) -> Outcome {
        match self.winner() {
            Some((mark, line)) => Outcome::Won { mark, line },
            None if self.is_full() => Outcome::Draw,
            None => Outcome::Active,
        }
    }
}
