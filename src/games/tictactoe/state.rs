//! Tic-Tac-Toe session: turn order, outcome and the delayed AI reply

use rand_pcg::Pcg32;
use serde::Serialize;

use super::board::{Board, CELL_COUNT, Mark, Outcome};
use super::minimax::{best_move, random_move};
use crate::consts::tictactoe::AI_THINK_DELAY_MS;
use crate::error::{ArcadeError, IllegalMove, Result};
use crate::feedback::FeedbackEvent;
use crate::highscores::{GameId, Scoreboard};
use crate::timers::TimerQueue;

/// Who plays O
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum TicTacToeMode {
    /// Human X against the computer's O
    #[default]
    VsAi,
    TwoPlayer,
}

impl TicTacToeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicTacToeMode::VsAi => "vs-ai",
            TicTacToeMode::TwoPlayer => "two-player",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "vs-ai" | "ai" => Ok(TicTacToeMode::VsAi),
            "two-player" | "pvp" => Ok(TicTacToeMode::TwoPlayer),
            _ => Err(ArcadeError::UnknownOption {
                kind: "tic-tac-toe mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Computer strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum TicTacToeDifficulty {
    /// Random empty cell
    Easy,
    /// Full minimax
    #[default]
    Hard,
}

impl TicTacToeDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicTacToeDifficulty::Easy => "easy",
            TicTacToeDifficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(TicTacToeDifficulty::Easy),
            "hard" => Ok(TicTacToeDifficulty::Hard),
            _ => Err(ArcadeError::UnknownOption {
                kind: "tic-tac-toe difficulty",
                value: s.to_string(),
            }),
        }
    }
}

/// Delayed work for this engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicTacToeTimer {
    AiMove,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicTacToeState {
    pub board: Board,
    /// Mark that moves next
    pub current: Mark,
    pub outcome: Outcome,
    pub mode: TicTacToeMode,
    pub difficulty: TicTacToeDifficulty,
    /// An AI reply is scheduled
    pub ai_pending: bool,
    #[serde(skip)]
    generation: u64,
    #[serde(skip)]
    timers: TimerQueue<TicTacToeTimer>,
    #[serde(skip)]
    rng: Pcg32,
    #[serde(skip)]
    pub(crate) events: Vec<FeedbackEvent>,
}

impl TicTacToeState {
    pub fn new(mode: TicTacToeMode, difficulty: TicTacToeDifficulty, seed: u64) -> Self {
        let mut state = Self {
            board: Board::new(),
            current: Mark::X,
            outcome: Outcome::Active,
            mode,
            difficulty,
            ai_pending: false,
            generation: 0,
            timers: TimerQueue::new(),
            rng: crate::session_rng(seed),
            events: Vec::new(),
        };
        state.clear_board();
        state
    }

    /// Fresh board, X to move, pending AI reply dropped
    pub fn reset(&mut self) {
        self.clear_board();
        self.events.push(FeedbackEvent::Started {
            game: GameId::TicTacToe,
        });
    }

    fn clear_board(&mut self) {
        self.generation += 1;
        self.timers.cancel_all();
        self.ai_pending = false;
        self.board = Board::new();
        self.current = Mark::X;
        self.outcome = Outcome::Active;
    }

    pub fn set_mode(&mut self, mode: TicTacToeMode) {
        self.mode = mode;
        self.reset();
    }

    pub fn set_difficulty(&mut self, difficulty: TicTacToeDifficulty) {
        self.difficulty = difficulty;
        self.reset();
    }

    /// The computer owns the next move
    pub fn is_ai_turn(&self) -> bool {
        self.mode == TicTacToeMode::VsAi && self.current == Mark::O && !self.outcome.is_terminal()
    }

    /// Place the current mover's mark
    pub fn play(
        &mut self,
        cell: usize,
        scores: &mut dyn Scoreboard,
    ) -> std::result::Result<(), IllegalMove> {
        if cell >= CELL_COUNT {
            return Err(IllegalMove::OutOfRange(cell));
        }
        if self.outcome.is_terminal() {
            return Err(IllegalMove::GameOver);
        }
        if self.is_ai_turn() {
            return Err(IllegalMove::NotYourTurn);
        }
        if !self.board.is_empty_at(cell) {
            return Err(IllegalMove::Occupied(cell));
        }
        self.place(cell, scores);
        Ok(())
    }

    /// Pick and play a move for the current mover right away
    ///
    /// Used by the AI timer and by headless hosts; cancels any pending reply.
    pub fn ai_move(&mut self, scores: &mut dyn Scoreboard) -> std::result::Result<usize, IllegalMove> {
        if self.outcome.is_terminal() {
            return Err(IllegalMove::GameOver);
        }
        self.timers.cancel_all();
        self.ai_pending = false;

        let choice = match self.difficulty {
            TicTacToeDifficulty::Easy => random_move(&self.board, &mut self.rng),
            TicTacToeDifficulty::Hard => best_move(&self.board, self.current),
        };
        let cell = choice.ok_or(IllegalMove::GameOver)?;
        log::debug!("AI ({:?}) plays {}", self.current, cell);
        self.place(cell, scores);
        Ok(cell)
    }

    /// Advance the engine clock and run due timers
    pub fn advance(&mut self, dt_ms: u64, scores: &mut dyn Scoreboard) {
        for fired in self.timers.advance(dt_ms) {
            if fired.generation != self.generation {
                log::warn!("Dropping stale tic-tac-toe timer");
                continue;
            }
            match fired.action {
                TicTacToeTimer::AiMove if self.ai_pending => {
                    // Board is active whenever a reply is pending
                    if let Err(e) = self.ai_move(scores) {
                        log::warn!("Pending AI reply failed: {}", e);
                        self.ai_pending = false;
                    }
                }
                TicTacToeTimer::AiMove => {}
            }
        }
    }

    /// Drop every pending timer; the engine is about to be discarded
    pub fn teardown(&mut self) {
        self.generation += 1;
        self.timers.cancel_all();
        self.ai_pending = false;
    }

    pub fn drain_events(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }

    fn place(&mut self, cell: usize, scores: &mut dyn Scoreboard) {
        let mark = self.current;
        self.board.set(cell, Some(mark));
        self.events.push(FeedbackEvent::MoveMade { cell, mark });

        self.outcome = self.board.outcome();
        match self.outcome {
            Outcome::Won { mark, line } => {
                log::info!("Tic-tac-toe won by {:?} on {:?}", mark, line);
                if mark == Mark::X {
                    let wins = scores.record_win(GameId::TicTacToe);
                    log::info!("X wins recorded: {}", wins);
                }
                self.events.push(FeedbackEvent::Won { mark, line });
            }
            Outcome::Draw => {
                log::info!("Tic-tac-toe draw");
                self.events.push(FeedbackEvent::Draw);
            }
            Outcome::Active => {
                self.current = mark.other();
                if self.is_ai_turn() {
                    self.ai_pending = true;
                    self.timers
                        .schedule(AI_THINK_DELAY_MS, self.generation, TicTacToeTimer::AiMove);
                    self.events.push(FeedbackEvent::AiThinking {
                        delay_ms: AI_THINK_DELAY_MS,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::highscores::ScoreStore;
    use crate::persistence::MemoryStorage;

    fn store() -> ScoreStore<MemoryStorage> {
        ScoreStore::load(MemoryStorage::new())
    }

    fn pvp() -> TicTacToeState {
        TicTacToeState::new(TicTacToeMode::TwoPlayer, TicTacToeDifficulty::Hard, 1)
    }

    #[test]
    fn test_top_row_wins() {
        let mut scores = store();
        let mut game = pvp();
        for cell in [0, 3, 1, 4, 2] {
            game.play(cell, &mut scores).unwrap();
        }
        assert_eq!(
            game.outcome,
            Outcome::Won {
                mark: Mark::X,
                line: [0, 1, 2]
            }
        );
        assert_eq!(scores.get(GameId::TicTacToe), 1);
        assert!(
            game.drain_events()
                .contains(&FeedbackEvent::Won { mark: Mark::X, line: [0, 1, 2] })
        );
        assert_eq!(game.play(5, &mut scores), Err(IllegalMove::GameOver));
    }

    #[test]
    fn test_due_reply_on_finished_board_is_dropped() {
        let mut scores = store();
        let mut game = TicTacToeState::new(TicTacToeMode::VsAi, TicTacToeDifficulty::Hard, 3);
        game.play(4, &mut scores).unwrap();
        assert!(game.ai_pending);
        game.drain_events();

        game.outcome = Outcome::Draw;
        game.advance(AI_THINK_DELAY_MS, &mut scores);
        assert_eq!(game.board.count(Mark::O), 0);
        assert!(!game.ai_pending);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_o_win_not_counted() {
        let mut scores = store();
        let mut game = pvp();
        for cell in [0, 3, 1, 4, 8, 5] {
            game.play(cell, &mut scores).unwrap();
        }
        assert!(matches!(game.outcome, Outcome::Won { mark: Mark::O, .. }));
        assert_eq!(scores.get(GameId::TicTacToe), 0);
    }

    #[test]
    fn test_illegal_moves() {
        let mut scores = store();
        let mut game = pvp();
        assert_eq!(game.play(9, &mut scores), Err(IllegalMove::OutOfRange(9)));
        game.play(4, &mut scores).unwrap();
        assert_eq!(game.play(4, &mut scores), Err(IllegalMove::Occupied(4)));
        assert_eq!(game.current, Mark::O);
    }

    #[test]
    fn test_draw() {
        let mut scores = store();
        let mut game = pvp();
        // X O X / X O O / O X X
        for cell in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            game.play(cell, &mut scores).unwrap();
        }
        assert_eq!(game.outcome, Outcome::Draw);
        assert!(game.drain_events().contains(&FeedbackEvent::Draw));
    }

    #[test]
    fn test_ai_replies_after_delay() {
        let mut scores = store();
        let mut game = TicTacToeState::new(TicTacToeMode::VsAi, TicTacToeDifficulty::Hard, 1);
        game.play(0, &mut scores).unwrap();
        assert!(game.ai_pending);
        assert_eq!(game.play(1, &mut scores), Err(IllegalMove::NotYourTurn));
        assert_eq!(
            game.drain_events(),
            vec![
                FeedbackEvent::MoveMade { cell: 0, mark: Mark::X },
                FeedbackEvent::AiThinking { delay_ms: 500 },
            ]
        );

        game.advance(499, &mut scores);
        assert_eq!(game.board.count(Mark::O), 0);
        game.advance(1, &mut scores);
        assert_eq!(game.board.count(Mark::O), 1);
        assert!(!game.ai_pending);
        assert_eq!(game.current, Mark::X);
    }

    #[test]
    fn test_reset_cancels_pending_reply() {
        let mut scores = store();
        let mut game = TicTacToeState::new(TicTacToeMode::VsAi, TicTacToeDifficulty::Easy, 1);
        game.play(4, &mut scores).unwrap();
        game.reset();
        game.advance(1000, &mut scores);
        assert_eq!(game.board, Board::new());
        assert_eq!(game.current, Mark::X);
    }

    #[test]
    fn test_hard_self_play_draws() {
        let mut scores = store();
        let mut game = pvp();
        while !game.outcome.is_terminal() {
            game.ai_move(&mut scores).unwrap();
        }
        assert_eq!(game.outcome, Outcome::Draw);
    }

    #[test]
    fn test_option_parsing() {
        assert_eq!(TicTacToeMode::from_str("pvp").unwrap(), TicTacToeMode::TwoPlayer);
        assert_eq!(TicTacToeMode::VsAi.as_str(), "vs-ai");
        assert_eq!(TicTacToeDifficulty::from_str("EASY").unwrap(), TicTacToeDifficulty::Easy);
        assert!(TicTacToeDifficulty::from_str("medium").is_err());
    }

    proptest! {
        #[test]
        fn prop_marks_stay_balanced(seed in any::<u64>(), picks in prop::collection::vec(0usize..12, 0..30)) {
            let mut scores = store();
            let mut game = TicTacToeState::new(TicTacToeMode::VsAi, TicTacToeDifficulty::Easy, seed);
            for pick in picks {
                let _ = game.play(pick, &mut scores);
                game.advance(AI_THINK_DELAY_MS, &mut scores);
                let x = game.board.count(Mark::X);
                let o = game.board.count(Mark::O);
                prop_assert!(x == o || x == o + 1);
                if game.outcome.is_terminal() {
                    prop_assert!(game.play(pick % 9, &mut scores).is_err());
                    break;
                }
            }
        }
    }
}
