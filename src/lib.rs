//! Neon Arcade - a browser arcade hub of four mini-games
//!
//! Core modules:
//! - `games`: Simulation and decision engines (Snake, Flyer, Tic-Tac-Toe, Memory Match)
//! - `highscores`: Best-score-per-game record with per-game comparison policy
//! - `persistence`: Key/value storage backends (LocalStorage on web, in-memory elsewhere)
//! - `settings`: Theme and per-game preferences
//! - `feedback`: Events emitted by the engines and the audio cues they map to
//! - `hub`: Holds the single live game session
//! - `timers`: Generation-guarded delayed callbacks

pub mod error;
pub mod feedback;
pub mod games;
pub mod highscores;
pub mod hub;
pub mod persistence;
pub mod settings;
pub mod timers;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{ArcadeError, IllegalMove, Result};
pub use feedback::{Cue, FeedbackEvent, PresentationSink};
pub use highscores::{GameId, ScorePolicy, Scoreboard, ScoreStore};
pub use hub::{Hub, Session};
pub use settings::{Settings, Theme};

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Game configuration constants
pub mod consts {
    /// Snake grid and pacing
    pub mod snake {
        /// Grid is GRID_COLS x GRID_ROWS cells (400px canvas / 20px cells)
        pub const GRID_COLS: i32 = 20;
        pub const GRID_ROWS: i32 = 20;
        /// Starting head cell
        pub const START_CELL: (i32, i32) = (10, 10);

        /// Interval decrement per food eaten (ms)
        pub const FOOD_SPEEDUP_MS: u32 = 2;
        /// Interval decrement for a speed power-up (ms)
        pub const POWERUP_SPEEDUP_MS: u32 = 10;
        /// Tick interval never drops below this (ms)
        pub const MIN_INTERVAL_MS: u32 = 50;

        /// Bonus granted by a points power-up
        pub const POWERUP_BONUS: u32 = 5;
        /// Power-ups only spawn once the score exceeds this
        pub const POWERUP_SCORE_THRESHOLD: u32 = 5;
        /// Chance of spawning a power-up after each food
        pub const POWERUP_SPAWN_CHANCE: f64 = 0.3;
        /// Ticks a power-up stays on the board
        pub const POWERUP_LIFETIME_TICKS: u32 = 40;

        /// Obstacles = score / OBSTACLE_SCORE_STEP + OBSTACLE_BASE
        pub const OBSTACLE_SCORE_STEP: u32 = 10;
        pub const OBSTACLE_BASE: u32 = 2;
    }

    /// Flyer physics (units are canvas pixels per tick)
    pub mod flyer {
        pub const VIEWPORT_WIDTH: f32 = 400.0;
        pub const VIEWPORT_HEIGHT: f32 = 600.0;

        pub const ACTOR_X: f32 = 100.0;
        pub const ACTOR_SIZE: f32 = 30.0;

        pub const GRAVITY: f32 = 0.5;
        /// Velocity set by a flap (negative is up)
        pub const FLAP_IMPULSE: f32 = -8.0;

        pub const OBSTACLE_SPEED: f32 = 3.0;
        pub const OBSTACLE_WIDTH: f32 = 60.0;
        pub const GAP_HEIGHT: f32 = 150.0;
        /// Smallest top (and bottom) pipe height
        pub const MIN_PIPE_HEIGHT: f32 = 50.0;
        /// A new pair spawns once the trailing pair is this far from the right edge
        pub const SPAWN_SPACING: f32 = 300.0;

        /// Fixed tick interval (ms)
        pub const TICK_INTERVAL_MS: u32 = 20;
    }

    /// Tic-Tac-Toe pacing
    pub mod tictactoe {
        /// Delay before the AI answers a human move (ms)
        pub const AI_THINK_DELAY_MS: u64 = 500;
    }

    /// Memory Match pacing
    pub mod memory {
        /// How long a mismatched pair stays visible (ms)
        pub const MISMATCH_DELAY_MS: u64 = 1000;
        /// How long a hinted pair stays visible (ms)
        pub const HINT_DURATION_MS: u64 = 1000;
        /// Hints available per board
        pub const HINT_ALLOWANCE: u32 = 3;
    }
}

/// Build the deterministic per-session generator
pub fn session_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
