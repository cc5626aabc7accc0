//! Arcade hub
//!
//! Owns the score store, the settings and at most one live game. Launching a
//! game tears the previous one down (dropping its timers) and builds a fresh
//! engine from the current settings. The host drives the live game through
//! `tick` at `tick_interval_ms` and `advance` with wall-clock milliseconds.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::flyer::TICK_INTERVAL_MS as FLYER_TICK_MS;
use crate::error::{ArcadeError, Result};
use crate::feedback::{FeedbackEvent, PresentationSink};
use crate::games::flyer::{self, FlyerState};
use crate::games::memory::{MemoryDifficulty, MemoryState};
use crate::games::snake::{self, Direction, SnakePhase, SnakeSpeed, SnakeState};
use crate::games::tictactoe::{TicTacToeDifficulty, TicTacToeMode, TicTacToeState};
use crate::highscores::{GameId, ScoreStore};
use crate::persistence::KeyValueStorage;
use crate::settings::{Settings, Theme};

/// The live game
#[derive(Debug, Clone)]
pub enum Session {
    Snake(SnakeState),
    Flyer(FlyerState),
    TicTacToe(TicTacToeState),
    Memory(MemoryState),
}

impl Session {
    pub fn game(&self) -> GameId {
        match self {
            Session::Snake(_) => GameId::Snake,
            Session::Flyer(_) => GameId::Flyer,
            Session::TicTacToe(_) => GameId::TicTacToe,
            Session::Memory(_) => GameId::Memory,
        }
    }

    fn drain_events(&mut self) -> Vec<FeedbackEvent> {
        match self {
            Session::Snake(s) => s.drain_events(),
            Session::Flyer(s) => s.drain_events(),
            Session::TicTacToe(s) => s.drain_events(),
            Session::Memory(s) => s.drain_events(),
        }
    }

    fn teardown(&mut self) {
        match self {
            Session::TicTacToe(s) => s.teardown(),
            Session::Memory(s) => s.teardown(),
            Session::Snake(_) | Session::Flyer(_) => {}
        }
    }
}

/// One row of the stats panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreLine {
    pub game: GameId,
    /// None while unset
    pub best: Option<u64>,
}

/// Snapshot handed to the presentation side
#[derive(Debug, Serialize)]
#[serde(tag = "screen", rename_all = "lowercase")]
pub enum SessionView<'a> {
    Home {
        theme: &'static str,
        /// Every theme class, for the picker
        themes: Vec<&'static str>,
        scores: Vec<ScoreLine>,
    },
    Snake {
        state: &'a SnakeState,
        best: u64,
    },
    Flyer {
        state: &'a FlyerState,
        best: u64,
    },
    TicTacToe {
        state: &'a TicTacToeState,
        wins: u64,
    },
    Memory {
        state: &'a MemoryState,
        best: Option<u64>,
    },
}

pub struct Hub<S: KeyValueStorage> {
    scores: ScoreStore<S>,
    settings: Settings,
    session: Option<Session>,
    /// Seeds each new session
    rng: Pcg32,
}

impl<S: KeyValueStorage> Hub<S> {
    /// Load scores and the theme from `storage`
    pub fn new(storage: S, seed: u64) -> Self {
        let settings = Settings::load(&storage);
        let scores = ScoreStore::load(storage);
        Self {
            scores,
            settings,
            session: None,
            rng: crate::session_rng(seed),
        }
    }

    pub fn scores(&self) -> &ScoreStore<S> {
        &self.scores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn current_game(&self) -> Option<GameId> {
        self.session.as_ref().map(Session::game)
    }

    // === Navigation ===

    /// Replace the live session with a fresh `game`
    pub fn launch(&mut self, game: GameId) {
        self.go_home();
        let seed = self.rng.random::<u64>();
        let session = match game {
            GameId::Snake => Session::Snake(SnakeState::new(self.settings.snake_speed, seed)),
            GameId::Flyer => Session::Flyer(FlyerState::new(seed)),
            GameId::TicTacToe => {
                let mut state = TicTacToeState::new(
                    self.settings.tictactoe_mode,
                    self.settings.tictactoe_difficulty,
                    seed,
                );
                state.reset();
                Session::TicTacToe(state)
            }
            GameId::Memory => {
                Session::Memory(MemoryState::new(self.settings.memory_difficulty, seed))
            }
        };
        log::info!("Launched {}", game.as_str());
        self.session = Some(session);
    }

    /// Launch by name (`"snake"`, `"flappy"`, ...)
    pub fn launch_by_name(&mut self, name: &str) -> Result<()> {
        let game = GameId::from_str(name)?;
        self.launch(game);
        Ok(())
    }

    /// Tear down the live session and show the hub
    pub fn go_home(&mut self) {
        if let Some(mut session) = self.session.take() {
            // Undelivered events go with the discarded game
            session.teardown();
            log::info!("Left {}", session.game().as_str());
        }
    }

    /// Restart the live game with the same options
    pub fn restart(&mut self) {
        match &mut self.session {
            Some(Session::Snake(s)) => s.reset(),
            Some(Session::Flyer(s)) => s.reset(),
            Some(Session::TicTacToe(s)) => s.reset(),
            Some(Session::Memory(s)) => {
                let difficulty = s.difficulty;
                s.setup(difficulty);
            }
            None => {}
        }
    }

    // === Clock ===

    /// One fixed step of the real-time game, if any
    pub fn tick(&mut self) {
        match &mut self.session {
            Some(Session::Snake(s)) => snake::tick(s, &mut self.scores),
            Some(Session::Flyer(s)) => flyer::tick(s, &mut self.scores),
            _ => {}
        }
    }

    /// Wall-clock time for delayed callbacks
    pub fn advance(&mut self, dt_ms: u64) {
        match &mut self.session {
            Some(Session::TicTacToe(s)) => s.advance(dt_ms, &mut self.scores),
            Some(Session::Memory(s)) => s.advance(dt_ms),
            _ => {}
        }
    }

    /// Interval the host should call `tick` at; None for turn-based games
    pub fn tick_interval_ms(&self) -> Option<u32> {
        match &self.session {
            Some(Session::Snake(s)) => Some(s.interval_ms),
            Some(Session::Flyer(_)) => Some(FLYER_TICK_MS),
            _ => None,
        }
    }

    // === Input ===

    /// Start (or restart after game over) the real-time game
    pub fn start(&mut self) {
        match &mut self.session {
            Some(Session::Snake(s)) => s.start(),
            Some(Session::Flyer(s)) => s.start(),
            _ => {}
        }
    }

    pub fn steer(&mut self, dir: Direction) {
        if let Some(Session::Snake(s)) = &mut self.session {
            s.set_direction(dir);
        }
    }

    /// Swipe gesture in screen pixels
    pub fn swipe(&mut self, dx: f32, dy: f32) {
        if let Some(dir) = Direction::from_swipe(dx, dy) {
            self.steer(dir);
        }
    }

    pub fn toggle_pause(&mut self) {
        if let Some(Session::Snake(s)) = &mut self.session {
            s.toggle_pause();
        }
    }

    pub fn flap(&mut self) {
        if let Some(Session::Flyer(s)) = &mut self.session {
            s.flap();
        }
    }

    /// Tic-Tac-Toe cell click
    pub fn play_cell(&mut self, cell: usize) -> Result<()> {
        match &mut self.session {
            Some(Session::TicTacToe(s)) => s.play(cell, &mut self.scores).map_err(ArcadeError::from),
            _ => Ok(()),
        }
    }

    /// Memory card click
    pub fn reveal(&mut self, slot: usize) {
        if let Some(Session::Memory(s)) = &mut self.session {
            s.reveal(slot, &mut self.scores);
        }
    }

    pub fn hint(&mut self) -> bool {
        match &mut self.session {
            Some(Session::Memory(s)) => s.hint(),
            _ => false,
        }
    }

    /// Keyboard input by `KeyboardEvent.key`; returns whether it was used
    pub fn handle_key(&mut self, key: &str) -> bool {
        match (&mut self.session, key) {
            (Some(Session::Snake(s)), "p" | "P" | "Escape") => {
                s.toggle_pause();
                true
            }
            (Some(Session::Snake(s)), " " | "Enter")
                if matches!(s.phase, SnakePhase::Ready | SnakePhase::GameOver) =>
            {
                s.start();
                true
            }
            (Some(Session::Snake(s)), _) => match Direction::from_key(key) {
                Some(dir) => {
                    s.set_direction(dir);
                    true
                }
                None => false,
            },
            (Some(Session::Flyer(s)), " " | "ArrowUp") => {
                s.flap();
                true
            }
            _ => false,
        }
    }

    // === Options ===

    /// Select and persist a theme; the in-memory choice sticks even if the write fails
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.settings.theme = theme;
        log::info!("Theme set to {}", theme.as_str());
        self.settings.save_theme(self.scores.storage_mut())
    }

    /// Change a named option; applies to the live game where it makes sense
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "theme" => self.set_theme(Theme::from_str(value)?)?,
            "snake_speed" => {
                let speed = SnakeSpeed::from_str(value)?;
                self.settings.snake_speed = speed;
                if let Some(Session::Snake(s)) = &mut self.session {
                    // A run in progress, paused or not, keeps its speed
                    if matches!(s.phase, SnakePhase::Ready | SnakePhase::GameOver) {
                        s.speed = speed;
                        s.reset();
                    }
                }
            }
            "tictactoe_mode" => {
                let mode = TicTacToeMode::from_str(value)?;
                self.settings.tictactoe_mode = mode;
                if let Some(Session::TicTacToe(s)) = &mut self.session {
                    s.set_mode(mode);
                }
            }
            "tictactoe_difficulty" => {
                let difficulty = TicTacToeDifficulty::from_str(value)?;
                self.settings.tictactoe_difficulty = difficulty;
                if let Some(Session::TicTacToe(s)) = &mut self.session {
                    s.set_difficulty(difficulty);
                }
            }
            "memory_difficulty" => {
                let difficulty = MemoryDifficulty::from_str(value)?;
                self.settings.memory_difficulty = difficulty;
                if let Some(Session::Memory(s)) = &mut self.session {
                    s.setup(difficulty);
                }
            }
            _ => {
                return Err(ArcadeError::UnknownOption {
                    kind: "option",
                    value: key.to_string(),
                });
            }
        }
        Ok(())
    }

    // === Output ===

    /// Take every queued event
    pub fn drain_events(&mut self) -> Vec<FeedbackEvent> {
        self.session
            .as_mut()
            .map(Session::drain_events)
            .unwrap_or_default()
    }

    pub fn view(&self) -> SessionView<'_> {
        match &self.session {
            None => SessionView::Home {
                theme: self.settings.theme.as_str(),
                themes: Theme::ALL.iter().map(Theme::as_str).collect(),
                scores: self
                    .scores
                    .all()
                    .into_iter()
                    .map(|(game, best)| ScoreLine { game, best })
                    .collect(),
            },
            Some(Session::Snake(state)) => SessionView::Snake {
                state,
                best: self.scores.get(GameId::Snake),
            },
            Some(Session::Flyer(state)) => SessionView::Flyer {
                state,
                best: self.scores.get(GameId::Flyer),
            },
            Some(Session::TicTacToe(state)) => SessionView::TicTacToe {
                state,
                wins: self.scores.get(GameId::TicTacToe),
            },
            Some(Session::Memory(state)) => {
                let best = self.scores.get(GameId::Memory);
                SessionView::Memory {
                    state,
                    best: (best > 0).then_some(best),
                }
            }
        }
    }

    /// Current view as a JSON string
    pub fn view_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.view())?)
    }

    /// Deliver queued events, then render the current view
    pub fn flush(&mut self, sink: &mut dyn PresentationSink) {
        for event in self.drain_events() {
            sink.on_event(&event);
        }
        sink.render(&self.view());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::memory::MemoryPhase;
    use crate::games::tictactoe::Mark;
    use crate::persistence::MemoryStorage;

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<FeedbackEvent>,
        screens: Vec<String>,
    }

    impl PresentationSink for RecordingSink {
        fn render(&mut self, view: &SessionView) {
            let json = serde_json::to_value(view).unwrap();
            self.screens.push(json["screen"].as_str().unwrap().to_string());
        }

        fn on_event(&mut self, event: &FeedbackEvent) {
            self.events.push(event.clone());
        }
    }

    fn hub() -> Hub<MemoryStorage> {
        Hub::new(MemoryStorage::new(), 1234)
    }

    #[test]
    fn test_home_view_lists_scores() {
        let mut hub = hub();
        let mut sink = RecordingSink::default();
        hub.flush(&mut sink);
        assert_eq!(sink.screens, vec!["home"]);

        let json: serde_json::Value = serde_json::from_str(&hub.view_json().unwrap()).unwrap();
        assert_eq!(json["screen"], "home");
        assert_eq!(json["theme"], "theme-cyan");
        assert_eq!(json["themes"].as_array().unwrap().len(), 4);
        assert_eq!(json["themes"][3], "theme-orange");
        assert_eq!(json["scores"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_snake_run_reaches_sink() {
        let mut hub = hub();
        let mut sink = RecordingSink::default();
        hub.launch(GameId::Snake);
        assert_eq!(hub.tick_interval_ms(), Some(150));
        assert!(hub.handle_key(" "));
        for _ in 0..20 {
            hub.tick();
        }
        hub.flush(&mut sink);

        assert_eq!(sink.events[0], FeedbackEvent::Started { game: GameId::Snake });
        assert!(
            sink.events
                .iter()
                .any(|e| matches!(e, FeedbackEvent::RunEnded { .. }))
        );
        assert_eq!(sink.screens, vec!["snake"]);
    }

    #[test]
    fn test_launch_replaces_and_cancels() {
        let mut hub = hub();
        hub.launch(GameId::Memory);
        hub.launch(GameId::TicTacToe);
        assert_eq!(hub.current_game(), Some(GameId::TicTacToe));
        hub.advance(10_000);
        assert!(hub.tick_interval_ms().is_none());

        hub.go_home();
        assert!(hub.current_game().is_none());
        // Home ignores game input
        hub.reveal(0);
        hub.tick();
        assert!(matches!(hub.view(), SessionView::Home { .. }));
    }

    #[test]
    fn test_tictactoe_ai_answers_through_advance() {
        let mut hub = hub();
        hub.launch(GameId::TicTacToe);
        hub.play_cell(4).unwrap();
        assert!(matches!(
            hub.play_cell(0),
            Err(ArcadeError::IllegalMove(crate::IllegalMove::NotYourTurn))
        ));
        hub.advance(500);
        let Some(Session::TicTacToe(state)) = hub.session() else {
            panic!("tic-tac-toe should be live");
        };
        assert_eq!(state.board.count(Mark::O), 1);
        let events = hub.drain_events();
        assert!(events.contains(&FeedbackEvent::AiThinking { delay_ms: 500 }));
    }

    #[test]
    fn test_memory_peek_then_play() {
        let mut hub = hub();
        hub.launch(GameId::Memory);
        hub.reveal(0);
        hub.advance(3000);
        hub.reveal(0);
        let Some(Session::Memory(state)) = hub.session() else {
            panic!("memory should be live");
        };
        assert_eq!(state.phase, MemoryPhase::OneRevealed);
        assert!(!hub.hint());
    }

    #[test]
    fn test_theme_persists_across_hubs() {
        let mut hub = hub();
        hub.set_option("theme", "purple").unwrap();
        let storage = hub.scores().storage().clone();
        let reloaded = Hub::new(storage, 1);
        assert_eq!(reloaded.settings().theme, Theme::Purple);
    }

    #[test]
    fn test_options_apply_to_next_launch() {
        let mut hub = hub();
        hub.set_option("snake_speed", "fast").unwrap();
        hub.launch(GameId::Snake);
        assert_eq!(hub.tick_interval_ms(), Some(80));

        hub.set_option("memory_difficulty", "hard").unwrap();
        hub.launch(GameId::Memory);
        let Some(Session::Memory(state)) = hub.session() else {
            panic!("memory should be live");
        };
        assert_eq!(state.deck.len(), 32);

        assert!(hub.set_option("snake_speed", "warp").is_err());
        assert!(hub.set_option("volume", "11").is_err());
    }

    #[test]
    fn test_snake_speed_spares_paused_run() {
        let mut hub = hub();
        hub.launch(GameId::Snake);
        hub.start();
        hub.toggle_pause();
        let before = match hub.session() {
            Some(Session::Snake(s)) => (s.food, s.obstacles.clone()),
            _ => panic!("snake should be live"),
        };
        hub.set_option("snake_speed", "fast").unwrap();
        let Some(Session::Snake(state)) = hub.session() else {
            panic!("snake should be live");
        };
        assert_eq!(state.phase, SnakePhase::Paused);
        assert_eq!((state.food, state.obstacles.clone()), before);
        assert_eq!(state.speed, SnakeSpeed::Normal);
        assert_eq!(hub.tick_interval_ms(), Some(150));
        assert_eq!(hub.settings().snake_speed, SnakeSpeed::Fast);

        // Ends the run, after which the new speed applies
        hub.go_home();
        hub.launch(GameId::Snake);
        hub.set_option("snake_speed", "slow").unwrap();
        assert_eq!(hub.tick_interval_ms(), Some(200));
    }

    #[test]
    fn test_flyer_keys() {
        let mut hub = hub();
        hub.launch_by_name("flappy").unwrap();
        assert_eq!(hub.tick_interval_ms(), Some(FLYER_TICK_MS));
        assert!(hub.handle_key(" "));
        assert!(!hub.handle_key("x"));
        let Some(Session::Flyer(state)) = hub.session() else {
            panic!("flyer should be live");
        };
        assert_eq!(state.phase, flyer::FlyerPhase::Running);
        assert!(hub.launch_by_name("pong").is_err());
    }
}
