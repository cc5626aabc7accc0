//! Flyer state and core types

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::flyer::*;
use crate::feedback::FeedbackEvent;
use crate::highscores::GameId;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlyerPhase {
    /// Waiting for the first flap
    Ready,
    Running,
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlyerCollision {
    /// Left the viewport vertically
    Bounds,
    Obstacle,
}

/// A top/bottom pipe pair with a gap between them
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Height of the top pipe; the gap starts here
    pub top_height: f32,
    /// Top edge of the bottom pipe; the gap ends here
    pub bottom_y: f32,
    /// Already scored
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, top_height: f32) -> Self {
        Self {
            x,
            top_height,
            bottom_y: top_height + GAP_HEIGHT,
            passed: false,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + OBSTACLE_WIDTH
    }
}

/// Complete flyer state
#[derive(Debug, Clone, Serialize)]
pub struct FlyerState {
    pub phase: FlyerPhase,
    /// Top-left corner of the actor box
    pub actor: Vec2,
    pub actor_size: Vec2,
    /// Vertical velocity (positive is down)
    pub velocity: f32,
    /// Oldest (leftmost) first
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Ticks simulated this run
    pub time_ticks: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    #[serde(skip)]
    pub(crate) events: Vec<FeedbackEvent>,
}

impl FlyerState {
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            phase: FlyerPhase::Ready,
            actor: Vec2::new(ACTOR_X, VIEWPORT_HEIGHT / 2.0),
            actor_size: Vec2::splat(ACTOR_SIZE),
            velocity: 0.0,
            obstacles: Vec::new(),
            score: 0,
            time_ticks: 0,
            rng: crate::session_rng(seed),
            events: Vec::new(),
        };
        state.reset();
        state
    }

    /// Any phase -> Ready, actor centred, one obstacle at the right edge
    pub fn reset(&mut self) {
        self.phase = FlyerPhase::Ready;
        self.actor = Vec2::new(ACTOR_X, VIEWPORT_HEIGHT / 2.0);
        self.velocity = 0.0;
        self.score = 0;
        self.time_ticks = 0;
        self.obstacles.clear();
        self.spawn_obstacle(VIEWPORT_WIDTH);
    }

    /// Ready/GameOver -> Running
    pub fn start(&mut self) {
        match self.phase {
            FlyerPhase::Ready => {}
            FlyerPhase::GameOver => self.reset(),
            FlyerPhase::Running => return,
        }
        self.phase = FlyerPhase::Running;
        self.events.push(FeedbackEvent::Started { game: GameId::Flyer });
        log::info!("Flyer run started");
    }

    /// First flap only starts the run; later flaps override the velocity
    pub fn flap(&mut self) {
        match self.phase {
            FlyerPhase::Ready => self.start(),
            FlyerPhase::Running => {
                self.velocity = FLAP_IMPULSE;
                self.events.push(FeedbackEvent::Flap);
            }
            FlyerPhase::GameOver => {}
        }
    }

    pub fn drain_events(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Append a pair at `x` with a random gap position
    pub(crate) fn spawn_obstacle(&mut self, x: f32) {
        let max_top = VIEWPORT_HEIGHT - GAP_HEIGHT - MIN_PIPE_HEIGHT;
        let top_height = self.rng.random_range(MIN_PIPE_HEIGHT..max_top);
        self.obstacles.push(Obstacle::new(x, top_height));
    }
}
