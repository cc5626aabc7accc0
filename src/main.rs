//! Neon Arcade entry point
//!
//! The browser build is driven from JS through `neon_arcade::web::WebArcade`.
//! Natively this runs a short headless demo: hard-AI self play, a scripted
//! snake run and a memory board solved from the peek.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use neon_arcade::games::memory::MemoryPhase;
    use neon_arcade::games::snake::{Direction, SnakePhase};
    use neon_arcade::games::tictactoe::{Outcome, TicTacToeDifficulty, TicTacToeMode, TicTacToeState};
    use neon_arcade::hub::SessionView;
    use neon_arcade::persistence::MemoryStorage;
    use neon_arcade::{FeedbackEvent, GameId, Hub, PresentationSink, ScoreStore, Session};

    /// Logs every event, counts renders
    #[derive(Default)]
    struct LogSink {
        renders: usize,
    }

    impl PresentationSink for LogSink {
        fn render(&mut self, _view: &SessionView) {
            self.renders += 1;
        }

        fn on_event(&mut self, event: &FeedbackEvent) {
            if event.celebrates() {
                log::info!("** {:?}", event);
            } else {
                log::debug!("{:?}", event);
            }
        }
    }

    pub fn run(seed: u64) {
        let mut hub = Hub::new(MemoryStorage::new(), seed);
        let mut sink = LogSink::default();

        self_play(&mut hub);
        snake_run(&mut hub, &mut sink);
        memory_run(&mut hub, &mut sink);

        hub.go_home();
        hub.flush(&mut sink);
        for (game, best) in hub.scores().all() {
            match best {
                Some(best) => println!("{:<10} {}", game.as_str(), best),
                None => println!("{:<10} -", game.as_str()),
            }
        }
        log::info!("Demo finished after {} renders", sink.renders);
    }

    /// Two perfect players always draw
    fn self_play(hub: &mut Hub<MemoryStorage>) {
        let mut game = TicTacToeState::new(TicTacToeMode::TwoPlayer, TicTacToeDifficulty::Hard, 0);
        let mut scores = ScoreStore::load(MemoryStorage::new());
        let mut moves = Vec::new();
        while let Ok(cell) = game.ai_move(&mut scores) {
            moves.push(cell);
        }
        match game.outcome {
            Outcome::Draw => log::info!("Hard vs hard: draw after {:?}", moves),
            other => log::warn!("Hard vs hard ended {:?} after {:?}", other, moves),
        }

        // Against the hub's AI with the same engine
        hub.launch(GameId::TicTacToe);
        for cell in [0, 4, 8, 2, 6, 1, 3, 5, 7] {
            if hub.play_cell(cell).is_ok() {
                hub.advance(neon_arcade::consts::tictactoe::AI_THINK_DELAY_MS);
            }
        }
        if let Some(Session::TicTacToe(state)) = hub.session() {
            log::info!("Scripted X vs hard O: {:?}", state.outcome);
        }
    }

    /// Steer a lap around the board until something is hit
    fn snake_run(hub: &mut Hub<MemoryStorage>, sink: &mut LogSink) {
        hub.launch(GameId::Snake);
        hub.start();
        let turns = [Direction::Down, Direction::Left, Direction::Up, Direction::Right];
        for step in 0..400u32 {
            if step % 7 == 6 {
                hub.steer(turns[(step / 7) as usize % turns.len()]);
            }
            hub.tick();
            hub.flush(sink);
            match hub.session() {
                Some(Session::Snake(s)) if s.phase == SnakePhase::GameOver => {
                    log::info!("Snake over after {} ticks, score {}", s.time_ticks, s.score);
                    return;
                }
                _ => {}
            }
        }
    }

    /// Remember the peek, then flip pairs perfectly
    fn memory_run(hub: &mut Hub<MemoryStorage>, sink: &mut LogSink) {
        hub.launch(GameId::Memory);
        let Some(Session::Memory(state)) = hub.session() else {
            return;
        };
        let symbols: Vec<&str> = state.deck.iter().map(|c| c.symbol).collect();
        let peek = state.difficulty.peek_ms();
        hub.advance(peek);

        let mut done = vec![false; symbols.len()];
        for first in 0..symbols.len() {
            if done[first] {
                continue;
            }
            let Some(second) = (first + 1..symbols.len()).find(|&i| symbols[i] == symbols[first]) else {
                continue;
            };
            done[first] = true;
            done[second] = true;
            hub.reveal(first);
            hub.reveal(second);
            hub.advance(250);
            hub.flush(sink);
        }
        if let Some(Session::Memory(state)) = hub.session() {
            if state.phase == MemoryPhase::Complete {
                log::info!("Memory cleared in {} moves", state.moves);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Neon Arcade (native) starting...");
    log::info!("Native mode is a headless demo - build for wasm32 to play in the browser");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);
    demo::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_main, this is just to satisfy the compiler
}
