//! Feedback events and the tone cues they trigger
//!
//! Engines never touch audio or pixels. They queue `FeedbackEvent`s which the
//! presentation side drains; `Cue` maps each event onto the arcade's tone table.

use serde::Serialize;

use crate::games::flyer::FlyerCollision;
use crate::games::snake::{PowerUpKind, SnakeCollision};
use crate::games::tictactoe::Mark;
use crate::highscores::GameId;
use crate::hub::SessionView;

/// Why a real-time run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "game", content = "cause", rename_all = "lowercase")]
pub enum Collision {
    Snake(SnakeCollision),
    Flyer(FlyerCollision),
}

/// Discrete event emitted by an engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedbackEvent {
    /// A run or board was started
    Started { game: GameId },
    /// Snake ate food
    AteFood { score: u64 },
    /// Snake picked up a power-up
    PowerUpCollected { kind: PowerUpKind, score: u64 },
    /// An uncollected power-up decayed
    PowerUpExpired,
    /// Flyer cleared an obstacle
    PointScored { score: u64 },
    Flap,
    /// Real-time run over
    RunEnded {
        cause: Collision,
        score: u64,
        new_record: bool,
    },
    MoveMade { cell: usize, mark: Mark },
    Won { mark: Mark, line: [usize; 3] },
    Draw,
    /// The AI will answer after this delay
    AiThinking { delay_ms: u64 },
    CardFlipped { slot: usize },
    Match { slots: [usize; 2] },
    Mismatch { slots: [usize; 2] },
    /// Memory board cleared
    Complete {
        moves: u32,
        elapsed_ms: u64,
        new_record: bool,
    },
    HintShown { slots: [usize; 2], hints_left: u32 },
}

impl FeedbackEvent {
    /// Events that should fire the celebration burst
    pub fn celebrates(&self) -> bool {
        match self {
            FeedbackEvent::RunEnded { new_record, .. } => *new_record,
            FeedbackEvent::Won { .. } | FeedbackEvent::Complete { .. } => true,
            _ => false,
        }
    }

    /// Audio cue for this event, if any
    pub fn cue(&self) -> Option<Cue> {
        match self {
            FeedbackEvent::Started { .. }
            | FeedbackEvent::MoveMade { .. }
            | FeedbackEvent::CardFlipped { .. } => Some(Cue::Click),
            FeedbackEvent::AteFood { .. } | FeedbackEvent::Match { .. } | FeedbackEvent::Won { .. } => {
                Some(Cue::Win)
            }
            FeedbackEvent::PointScored { .. } | FeedbackEvent::PowerUpCollected { .. } => {
                Some(Cue::Point)
            }
            FeedbackEvent::Flap => Some(Cue::Flap),
            FeedbackEvent::RunEnded { .. } | FeedbackEvent::Draw => Some(Cue::Lose),
            FeedbackEvent::HintShown { .. } => Some(Cue::Move),
            FeedbackEvent::PowerUpExpired
            | FeedbackEvent::AiThinking { .. }
            | FeedbackEvent::Mismatch { .. }
            | FeedbackEvent::Complete { .. } => None,
        }
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq_hz: f32,
    pub waveform: Waveform,
    pub duration_s: f64,
    /// Offset from the start of the cue
    pub delay_ms: u32,
}

const fn tone(freq_hz: f32, waveform: Waveform, duration_s: f64, delay_ms: u32) -> Tone {
    Tone {
        freq_hz,
        waveform,
        duration_s,
        delay_ms,
    }
}

const CLICK: &[Tone] = &[tone(600.0, Waveform::Sine, 0.1, 0)];
const WIN: &[Tone] = &[
    tone(400.0, Waveform::Square, 0.1, 0),
    tone(600.0, Waveform::Square, 0.1, 100),
    tone(800.0, Waveform::Square, 0.2, 200),
];
const LOSE: &[Tone] = &[
    tone(300.0, Waveform::Sawtooth, 0.3, 0),
    tone(200.0, Waveform::Sawtooth, 0.4, 200),
];
const MOVE: &[Tone] = &[tone(300.0, Waveform::Triangle, 0.05, 0)];
const FLAP: &[Tone] = &[tone(300.0, Waveform::Sine, 0.1, 0)];
const POINT: &[Tone] = &[tone(800.0, Waveform::Square, 0.2, 0)];

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Click,
    Win,
    Lose,
    Move,
    Flap,
    Point,
}

impl Cue {
    /// Gain of the shared output node, scaled by the user's volume
    pub const MASTER_GAIN: f32 = 0.3;
    /// Peak gain of each burst before the master node
    pub const TONE_GAIN: f32 = 0.3;

    pub fn tones(&self) -> &'static [Tone] {
        match self {
            Cue::Click => CLICK,
            Cue::Win => WIN,
            Cue::Lose => LOSE,
            Cue::Move => MOVE,
            Cue::Flap => FLAP,
            Cue::Point => POINT,
        }
    }
}

/// Consumer of engine output
pub trait PresentationSink {
    /// Draw the current session (or the hub when no game is live)
    fn render(&mut self, view: &SessionView);

    /// React to one discrete event
    fn on_event(&mut self, event: &FeedbackEvent);
}
