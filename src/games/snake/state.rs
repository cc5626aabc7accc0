//! Snake state and core types

use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::snake::*;
use crate::error::{ArcadeError, Result};
use crate::feedback::FeedbackEvent;
use crate::highscores::GameId;

/// A grid cell (column, row); (0, 0) is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Neighbouring cell one step along `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dc, dr) = dir.delta();
        Self::new(self.col + dc, self.row + dr)
    }

    pub fn in_bounds(&self) -> bool {
        (0..GRID_COLS).contains(&self.col) && (0..GRID_ROWS).contains(&self.row)
    }
}

/// Heading of the snake's head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// (column, row) offset; rows grow downward
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Arrow key names as reported by `KeyboardEvent.key`
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Swipe from touch-start to touch-move, dominant axis wins
    pub fn from_swipe(dx: f32, dy: f32) -> Option<Self> {
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        if dx.abs() > dy.abs() {
            Some(if dx < 0.0 { Direction::Left } else { Direction::Right })
        } else {
            Some(if dy < 0.0 { Direction::Up } else { Direction::Down })
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Speed tier chosen before a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum SnakeSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl SnakeSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnakeSpeed::Slow => "slow",
            SnakeSpeed::Normal => "normal",
            SnakeSpeed::Fast => "fast",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Ok(SnakeSpeed::Slow),
            "normal" => Ok(SnakeSpeed::Normal),
            "fast" => Ok(SnakeSpeed::Fast),
            _ => Err(ArcadeError::UnknownOption {
                kind: "snake speed",
                value: s.to_string(),
            }),
        }
    }

    /// Starting tick interval (ms)
    pub fn base_interval_ms(&self) -> u32 {
        match self {
            SnakeSpeed::Slow => 200,
            SnakeSpeed::Normal => 150,
            SnakeSpeed::Fast => 80,
        }
    }
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SnakePhase {
    /// Board shown, waiting for start
    Ready,
    Running,
    Paused,
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SnakeCollision {
    Wall,
    #[serde(rename = "Self")]
    SelfHit,
    Obstacle,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerUpKind {
    /// Shrinks the tick interval
    Speed,
    /// Flat score bonus
    Points,
}

/// A power-up on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerUp {
    pub cell: Cell,
    pub kind: PowerUpKind,
    pub ticks_left: u32,
}

/// Complete snake state
#[derive(Debug, Clone, Serialize)]
pub struct SnakeState {
    pub speed: SnakeSpeed,
    pub phase: SnakePhase,
    /// Head first
    pub body: VecDeque<Cell>,
    pub heading: Direction,
    /// Applied at the start of the next tick
    pub pending_heading: Direction,
    /// Current tick interval (ms)
    pub interval_ms: u32,
    pub score: u32,
    pub food: Option<Cell>,
    pub power_up: Option<PowerUp>,
    pub obstacles: Vec<Cell>,
    /// Ticks simulated this run
    pub time_ticks: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    #[serde(skip)]
    pub(crate) events: Vec<FeedbackEvent>,
}

impl SnakeState {
    /// Create a fresh board with the given speed tier and seed
    pub fn new(speed: SnakeSpeed, seed: u64) -> Self {
        let mut state = Self {
            speed,
            phase: SnakePhase::Ready,
            body: VecDeque::new(),
            heading: Direction::Right,
            pending_heading: Direction::Right,
            interval_ms: speed.base_interval_ms(),
            score: 0,
            food: None,
            power_up: None,
            obstacles: Vec::new(),
            time_ticks: 0,
            rng: crate::session_rng(seed),
            events: Vec::new(),
        };
        state.reset();
        state
    }

    /// Any phase -> Ready with default body, food, obstacles, score and interval
    pub fn reset(&mut self) {
        let (col, row) = START_CELL;
        self.phase = SnakePhase::Ready;
        self.body = VecDeque::from([Cell::new(col, row)]);
        self.heading = Direction::Right;
        self.pending_heading = Direction::Right;
        self.interval_ms = self.speed.base_interval_ms();
        self.score = 0;
        self.power_up = None;
        self.obstacles.clear();
        self.food = None;
        self.time_ticks = 0;
        self.spawn_food();
        self.regenerate_obstacles();
    }

    /// Ready/GameOver -> Running
    pub fn start(&mut self) {
        match self.phase {
            SnakePhase::Ready => {}
            SnakePhase::GameOver => self.reset(),
            SnakePhase::Running | SnakePhase::Paused => return,
        }
        self.phase = SnakePhase::Running;
        self.events.push(FeedbackEvent::Started { game: GameId::Snake });
        log::info!("Snake run started ({} ms)", self.interval_ms);
    }

    /// Queue a heading change unless it reverses the current heading
    pub fn set_direction(&mut self, dir: Direction) {
        if self.phase == SnakePhase::Paused {
            return;
        }
        if dir != self.heading.opposite() {
            self.pending_heading = dir;
        }
    }

    pub fn pause(&mut self) {
        if self.phase == SnakePhase::Running {
            self.phase = SnakePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == SnakePhase::Paused {
            self.phase = SnakePhase::Running;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            SnakePhase::Running => self.pause(),
            SnakePhase::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn head(&self) -> Cell {
        // Body is never empty; reset always seeds the head
        self.body.front().copied().unwrap_or(Cell::new(START_CELL.0, START_CELL.1))
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }

    fn occupied(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
            || self.obstacles.contains(&cell)
            || self.food == Some(cell)
            || self.power_up.is_some_and(|p| p.cell == cell)
    }

    /// Uniformly random cell free of body, obstacles, food and power-up
    pub(crate) fn random_free_cell(&mut self) -> Option<Cell> {
        let free: Vec<Cell> = (0..GRID_ROWS)
            .flat_map(|row| (0..GRID_COLS).map(move |col| Cell::new(col, row)))
            .filter(|&cell| !self.occupied(cell))
            .collect();
        if free.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..free.len());
        Some(free[idx])
    }

    pub(crate) fn spawn_food(&mut self) {
        self.food = None;
        self.food = self.random_free_cell();
        if self.food.is_none() {
            log::warn!("No free cell left for food");
        }
    }

    /// Replace the obstacle field; size grows with the score
    pub(crate) fn regenerate_obstacles(&mut self) {
        self.obstacles.clear();
        let count = self.score / OBSTACLE_SCORE_STEP + OBSTACLE_BASE;
        for _ in 0..count {
            match self.random_free_cell() {
                Some(cell) => self.obstacles.push(cell),
                None => break,
            }
        }
        log::debug!("Snake obstacles: {}", self.obstacles.len());
    }

    /// Shrink the tick interval, never below the floor
    pub(crate) fn speed_up(&mut self, by_ms: u32) {
        self.interval_ms = self.interval_ms.saturating_sub(by_ms).max(MIN_INTERVAL_MS);
    }
}
