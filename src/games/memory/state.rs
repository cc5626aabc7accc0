//! Memory Match session

use rand_pcg::Pcg32;
use serde::Serialize;

use super::deck::{Card, build_deck};
use crate::consts::memory::*;
use crate::error::{ArcadeError, Result};
use crate::feedback::FeedbackEvent;
use crate::highscores::{GameId, Scoreboard};
use crate::timers::TimerQueue;

/// Board size and peek length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum MemoryDifficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl MemoryDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryDifficulty::Easy => "easy",
            MemoryDifficulty::Medium => "medium",
            MemoryDifficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(MemoryDifficulty::Easy),
            "medium" => Ok(MemoryDifficulty::Medium),
            "hard" => Ok(MemoryDifficulty::Hard),
            _ => Err(ArcadeError::UnknownOption {
                kind: "memory difficulty",
                value: s.to_string(),
            }),
        }
    }

    /// Distinct symbols on the board
    pub fn symbol_count(&self) -> usize {
        match self {
            MemoryDifficulty::Easy | MemoryDifficulty::Medium => 8,
            MemoryDifficulty::Hard => 16,
        }
    }

    /// How long every card is shown after setup (ms)
    pub fn peek_ms(&self) -> u64 {
        match self {
            MemoryDifficulty::Easy => 3000,
            MemoryDifficulty::Medium => 2000,
            MemoryDifficulty::Hard => 1500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemoryPhase {
    /// Every card shown after setup
    Peek,
    /// Waiting for a first pick
    Idle,
    /// First pick face up
    OneRevealed,
    /// Comparing the second pick
    Evaluating,
    /// A mismatch or hint is showing
    Locked,
    Complete,
}

/// Delayed work for this engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryTimer {
    EndPeek,
    HideMismatch([usize; 2]),
    HideHint([usize; 2]),
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryState {
    pub difficulty: MemoryDifficulty,
    pub phase: MemoryPhase,
    pub deck: Vec<Card>,
    /// First pick of the current attempt
    pub held: Option<usize>,
    /// Pair attempts so far
    pub moves: u32,
    pub pairs_matched: u32,
    pub hints_left: u32,
    /// Play time, excluding the peek
    pub elapsed_ms: u64,
    #[serde(skip)]
    generation: u64,
    #[serde(skip)]
    timers: TimerQueue<MemoryTimer>,
    #[serde(skip)]
    rng: Pcg32,
    #[serde(skip)]
    pub(crate) events: Vec<FeedbackEvent>,
}

impl MemoryState {
    pub fn new(difficulty: MemoryDifficulty, seed: u64) -> Self {
        let mut state = Self {
            difficulty,
            phase: MemoryPhase::Peek,
            deck: Vec::new(),
            held: None,
            moves: 0,
            pairs_matched: 0,
            hints_left: HINT_ALLOWANCE,
            elapsed_ms: 0,
            generation: 0,
            timers: TimerQueue::new(),
            rng: crate::session_rng(seed),
            events: Vec::new(),
        };
        state.setup(difficulty);
        state
    }

    /// Deal a fresh shuffled board and start the peek
    pub fn setup(&mut self, difficulty: MemoryDifficulty) {
        self.generation += 1;
        self.timers.cancel_all();

        self.difficulty = difficulty;
        self.deck = build_deck(difficulty.symbol_count(), &mut self.rng);
        self.held = None;
        self.moves = 0;
        self.pairs_matched = 0;
        self.hints_left = HINT_ALLOWANCE;
        self.elapsed_ms = 0;

        self.phase = MemoryPhase::Peek;
        for card in &mut self.deck {
            card.revealed = true;
        }
        self.timers
            .schedule(difficulty.peek_ms(), self.generation, MemoryTimer::EndPeek);

        log::info!(
            "Memory board dealt: {} cards ({})",
            self.deck.len(),
            difficulty.as_str()
        );
        self.events.push(FeedbackEvent::Started { game: GameId::Memory });
    }

    pub fn total_pairs(&self) -> u32 {
        (self.deck.len() / 2) as u32
    }

    /// Flip a card; ignored unless the board accepts picks
    pub fn reveal(&mut self, slot: usize, scores: &mut dyn Scoreboard) {
        if !matches!(self.phase, MemoryPhase::Idle | MemoryPhase::OneRevealed) {
            return;
        }
        match self.deck.get(slot) {
            Some(card) if !card.matched => {}
            _ => return,
        }
        if self.held == Some(slot) {
            return;
        }

        self.deck[slot].revealed = true;
        self.events.push(FeedbackEvent::CardFlipped { slot });

        let Some(first) = self.held else {
            self.held = Some(slot);
            self.phase = MemoryPhase::OneRevealed;
            return;
        };

        self.phase = MemoryPhase::Evaluating;
        self.moves += 1;
        self.held = None;
        let slots = [first, slot];

        if self.deck[first].symbol == self.deck[slot].symbol {
            self.deck[first].matched = true;
            self.deck[slot].matched = true;
            self.pairs_matched += 1;
            self.events.push(FeedbackEvent::Match { slots });
            if self.pairs_matched == self.total_pairs() {
                self.complete(scores);
            } else {
                self.phase = MemoryPhase::Idle;
            }
        } else {
            self.phase = MemoryPhase::Locked;
            self.events.push(FeedbackEvent::Mismatch { slots });
            self.timers.schedule(
                MISMATCH_DELAY_MS,
                self.generation,
                MemoryTimer::HideMismatch(slots),
            );
        }
    }

    fn complete(&mut self, scores: &mut dyn Scoreboard) {
        self.phase = MemoryPhase::Complete;
        let new_record = scores.submit(GameId::Memory, u64::from(self.moves));
        log::info!(
            "Memory board cleared in {} moves, {} ms{}",
            self.moves,
            self.elapsed_ms,
            if new_record { " (new record)" } else { "" }
        );
        self.events.push(FeedbackEvent::Complete {
            moves: self.moves,
            elapsed_ms: self.elapsed_ms,
            new_record,
        });
    }

    /// Briefly show one unmatched pair; returns whether a hint was used
    pub fn hint(&mut self) -> bool {
        if self.phase != MemoryPhase::Idle || self.hints_left == 0 {
            return false;
        }
        let Some(slots) = self.hidden_pair() else {
            return false;
        };

        self.hints_left -= 1;
        for slot in slots {
            self.deck[slot].revealed = true;
        }
        self.phase = MemoryPhase::Locked;
        self.events.push(FeedbackEvent::HintShown {
            slots,
            hints_left: self.hints_left,
        });
        self.timers
            .schedule(HINT_DURATION_MS, self.generation, MemoryTimer::HideHint(slots));
        true
    }

    /// Lowest hidden slot and its partner
    fn hidden_pair(&self) -> Option<[usize; 2]> {
        let hidden = |c: &Card| !c.matched && !c.revealed;
        let first = self.deck.iter().position(hidden)?;
        let symbol = self.deck[first].symbol;
        let second = self
            .deck
            .iter()
            .enumerate()
            .skip(first + 1)
            .find(|(_, c)| hidden(*c) && c.symbol == symbol)
            .map(|(i, _)| i)?;
        Some([first, second])
    }

    /// Advance the engine clock, accumulate play time and run due timers
    pub fn advance(&mut self, dt_ms: u64) {
        if !matches!(self.phase, MemoryPhase::Peek | MemoryPhase::Complete) {
            self.elapsed_ms += dt_ms;
        }
        for fired in self.timers.advance(dt_ms) {
            if fired.generation != self.generation {
                log::warn!("Dropping stale memory timer {:?}", fired.action);
                continue;
            }
            match fired.action {
                MemoryTimer::EndPeek => {
                    for card in &mut self.deck {
                        card.revealed = card.matched;
                    }
                    self.phase = MemoryPhase::Idle;
                }
                MemoryTimer::HideMismatch(slots) | MemoryTimer::HideHint(slots) => {
                    for slot in slots {
                        if let Some(card) = self.deck.get_mut(slot) {
                            card.revealed = card.matched;
                        }
                    }
                    self.held = None;
                    self.phase = MemoryPhase::Idle;
                }
            }
        }
    }

    /// Cancel every pending timer before the engine is dropped
    pub fn teardown(&mut self) {
        self.generation += 1;
        self.timers.cancel_all();
    }

    pub fn drain_events(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::ScoreStore;
    use crate::persistence::MemoryStorage;

    fn store() -> ScoreStore<MemoryStorage> {
        ScoreStore::load(MemoryStorage::new())
    }

    /// Easy board past its peek
    fn idle_board(seed: u64) -> MemoryState {
        let mut state = MemoryState::new(MemoryDifficulty::Easy, seed);
        state.advance(MemoryDifficulty::Easy.peek_ms());
        state.drain_events();
        state
    }

    fn partner(state: &MemoryState, slot: usize) -> usize {
        let symbol = state.deck[slot].symbol;
        (0..state.deck.len())
            .find(|&i| i != slot && state.deck[i].symbol == symbol)
            .unwrap()
    }

    fn non_partner(state: &MemoryState, slot: usize) -> usize {
        let symbol = state.deck[slot].symbol;
        (0..state.deck.len())
            .find(|&i| state.deck[i].symbol != symbol)
            .unwrap()
    }

    #[test]
    fn test_board_sizes() {
        let easy = MemoryState::new(MemoryDifficulty::Easy, 1);
        assert_eq!(easy.deck.len(), 16);
        assert_eq!(easy.total_pairs(), 8);
        let hard = MemoryState::new(MemoryDifficulty::Hard, 1);
        assert_eq!(hard.deck.len(), 32);
    }

    #[test]
    fn test_peek_shows_then_hides() {
        let mut scores = store();
        let mut state = MemoryState::new(MemoryDifficulty::Medium, 4);
        assert_eq!(state.phase, MemoryPhase::Peek);
        assert!(state.deck.iter().all(|c| c.revealed));

        state.reveal(0, &mut scores);
        assert_eq!(state.held, None);

        state.advance(1999);
        assert_eq!(state.phase, MemoryPhase::Peek);
        state.advance(1);
        assert_eq!(state.phase, MemoryPhase::Idle);
        assert!(state.deck.iter().all(|c| !c.revealed));
        assert_eq!(state.elapsed_ms, 0);
    }

    #[test]
    fn test_match() {
        let mut scores = store();
        let mut state = idle_board(2);
        let other = partner(&state, 0);
        state.reveal(0, &mut scores);
        assert_eq!(state.phase, MemoryPhase::OneRevealed);
        state.reveal(other, &mut scores);

        assert_eq!(state.phase, MemoryPhase::Idle);
        assert_eq!(state.moves, 1);
        assert_eq!(state.pairs_matched, 1);
        assert!(state.deck[0].matched && state.deck[other].matched);
        assert_eq!(
            state.drain_events(),
            vec![
                FeedbackEvent::CardFlipped { slot: 0 },
                FeedbackEvent::CardFlipped { slot: other },
                FeedbackEvent::Match { slots: [0, other] },
            ]
        );
    }

    #[test]
    fn test_matched_and_held_slots_ignored() {
        let mut scores = store();
        let mut state = idle_board(2);
        let other = partner(&state, 0);
        state.reveal(0, &mut scores);
        state.reveal(0, &mut scores);
        assert_eq!(state.phase, MemoryPhase::OneRevealed);
        state.reveal(other, &mut scores);
        state.drain_events();

        state.reveal(0, &mut scores);
        assert_eq!(state.held, None);
        assert_eq!(state.moves, 1);
        assert!(state.drain_events().is_empty());

        state.reveal(99, &mut scores);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_mismatch_locks_then_hides() {
        let mut scores = store();
        let mut state = idle_board(3);
        let wrong = non_partner(&state, 0);
        state.reveal(0, &mut scores);
        state.reveal(wrong, &mut scores);

        assert_eq!(state.phase, MemoryPhase::Locked);
        assert_eq!(state.moves, 1);
        assert!(state.drain_events().contains(&FeedbackEvent::Mismatch { slots: [0, wrong] }));

        // Locked board ignores picks
        let third = (0..16).find(|&i| i != 0 && i != wrong).unwrap();
        state.reveal(third, &mut scores);
        assert!(!state.deck[third].revealed);

        state.advance(MISMATCH_DELAY_MS);
        assert_eq!(state.phase, MemoryPhase::Idle);
        assert!(!state.deck[0].revealed && !state.deck[wrong].revealed);
        assert_eq!(state.elapsed_ms, MISMATCH_DELAY_MS);
    }

    #[test]
    fn test_clearing_board_completes_once() {
        let mut scores = store();
        let mut state = idle_board(5);
        for slot in 0..state.deck.len() {
            if state.deck[slot].matched {
                continue;
            }
            let other = partner(&state, slot);
            state.reveal(slot, &mut scores);
            state.reveal(other, &mut scores);
        }
        assert_eq!(state.phase, MemoryPhase::Complete);
        assert_eq!(state.moves, 8);
        assert_eq!(scores.get(GameId::Memory), 8);

        state.reveal(0, &mut scores);
        state.advance(5000);
        let completes = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, FeedbackEvent::Complete { .. }))
            .count();
        assert_eq!(completes, 1);
        assert_eq!(state.elapsed_ms, 0);
    }

    #[test]
    fn test_setup_drops_pending_mismatch() {
        let mut scores = store();
        let mut state = idle_board(6);
        let wrong = non_partner(&state, 0);
        state.reveal(0, &mut scores);
        state.reveal(wrong, &mut scores);
        assert_eq!(state.phase, MemoryPhase::Locked);

        state.setup(MemoryDifficulty::Easy);
        state.advance(MISMATCH_DELAY_MS);
        assert_eq!(state.phase, MemoryPhase::Peek);
        assert!(state.deck.iter().all(|c| c.revealed));
        assert_eq!(state.moves, 0);
    }

    #[test]
    fn test_teardown_cancels_timers() {
        let mut state = MemoryState::new(MemoryDifficulty::Hard, 8);
        state.teardown();
        state.advance(10_000);
        assert_eq!(state.phase, MemoryPhase::Peek);
    }

    #[test]
    fn test_hint_shows_pair_without_a_move() {
        let mut scores = store();
        let mut state = idle_board(7);
        assert!(state.hint());
        assert_eq!(state.hints_left, HINT_ALLOWANCE - 1);
        assert_eq!(state.moves, 0);
        assert_eq!(state.phase, MemoryPhase::Locked);

        let shown: Vec<usize> = (0..16).filter(|&i| state.deck[i].revealed).collect();
        assert_eq!(shown.len(), 2);
        assert_eq!(state.deck[shown[0]].symbol, state.deck[shown[1]].symbol);

        state.advance(HINT_DURATION_MS);
        assert_eq!(state.phase, MemoryPhase::Idle);
        assert!(state.deck.iter().all(|c| !c.revealed));

        // Not while a pick is held
        state.reveal(0, &mut scores);
        assert!(!state.hint());
    }

    #[test]
    fn test_hints_run_out() {
        let mut state = idle_board(7);
        for _ in 0..HINT_ALLOWANCE {
            assert!(state.hint());
            state.advance(HINT_DURATION_MS);
        }
        assert!(!state.hint());
        assert_eq!(state.hints_left, 0);
    }

    #[test]
    fn test_memory_record_keeps_fewest_moves() {
        let mut scores = store();
        scores.update(GameId::Memory, 5);
        let mut state = idle_board(9);
        // Two wasted attempts, then a clean sweep
        let wrong = non_partner(&state, 0);
        for _ in 0..2 {
            state.reveal(0, &mut scores);
            state.reveal(wrong, &mut scores);
            state.advance(MISMATCH_DELAY_MS);
        }
        for slot in 0..state.deck.len() {
            if !state.deck[slot].matched {
                let other = partner(&state, slot);
                state.reveal(slot, &mut scores);
                state.reveal(other, &mut scores);
            }
        }
        assert_eq!(state.moves, 10);
        assert_eq!(scores.get(GameId::Memory), 5);
        assert!(matches!(
            state.drain_events().last(),
            Some(FeedbackEvent::Complete { moves: 10, new_record: false, .. })
        ));
    }
}
