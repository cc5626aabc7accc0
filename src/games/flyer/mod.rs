//! Flyer: gravity-driven side-scroller through gap obstacles

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, actor_hits_obstacle};
pub use state::{FlyerCollision, FlyerPhase, FlyerState, Obstacle};
pub use tick::tick;
