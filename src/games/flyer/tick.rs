//! Fixed timestep flyer tick

use super::collision::{Aabb, actor_hits_obstacle};
use super::state::{FlyerCollision, FlyerPhase, FlyerState};
use crate::consts::flyer::*;
use crate::feedback::{Collision, FeedbackEvent};
use crate::highscores::{GameId, Scoreboard};

/// Advance the flyer by one tick
pub fn tick(state: &mut FlyerState, scores: &mut dyn Scoreboard) {
    if state.phase != FlyerPhase::Running {
        return;
    }
    state.time_ticks += 1;

    // Physics
    state.velocity += GRAVITY;
    state.actor.y += state.velocity;

    // Scroll, then cull pairs fully off the left edge
    for obstacle in &mut state.obstacles {
        obstacle.x -= OBSTACLE_SPEED;
    }
    state.obstacles.retain(|o| o.right() >= 0.0);

    let needs_spawn = state
        .obstacles
        .last()
        .is_none_or(|last| last.x < VIEWPORT_WIDTH - SPAWN_SPACING);
    if needs_spawn {
        state.spawn_obstacle(VIEWPORT_WIDTH);
    }

    // Scoring
    let actor_x = state.actor.x;
    for obstacle in state.obstacles.iter_mut().filter(|o| !o.passed) {
        if obstacle.right() < actor_x {
            obstacle.passed = true;
            state.score += 1;
            state.events.push(FeedbackEvent::PointScored {
                score: u64::from(state.score),
            });
        }
    }

    // Failure
    if let Some(cause) = failure(state) {
        end_run(state, cause, scores);
    }
}

fn failure(state: &FlyerState) -> Option<FlyerCollision> {
    if state.actor.y < 0.0 || state.actor.y > VIEWPORT_HEIGHT - state.actor_size.y {
        return Some(FlyerCollision::Bounds);
    }
    let actor = Aabb::from_origin_size(state.actor, state.actor_size);
    state
        .obstacles
        .iter()
        .any(|o| actor_hits_obstacle(&actor, o))
        .then_some(FlyerCollision::Obstacle)
}

fn end_run(state: &mut FlyerState, cause: FlyerCollision, scores: &mut dyn Scoreboard) {
    state.phase = FlyerPhase::GameOver;
    let score = u64::from(state.score);
    let new_record = scores.submit(GameId::Flyer, score);
    log::info!(
        "Flyer run ended: {:?} at score {}{}",
        cause,
        score,
        if new_record { " (new record)" } else { "" }
    );
    state.events.push(FeedbackEvent::RunEnded {
        cause: Collision::Flyer(cause),
        score,
        new_record,
    });
}
