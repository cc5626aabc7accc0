//! Snake: fixed-interval grid simulation with obstacles and timed power-ups

pub mod state;
pub mod tick;

pub use state::{
    Cell, Direction, PowerUp, PowerUpKind, SnakeCollision, SnakePhase, SnakeSpeed, SnakeState,
};
pub use tick::tick;
