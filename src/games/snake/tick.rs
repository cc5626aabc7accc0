//! Fixed-interval snake tick
//!
//! Order within a tick: heading, movement, collision, then food/power-up
//! resolution. A heading queued between ticks only affects the next tick.

use rand::Rng;

use super::state::{Cell, PowerUp, PowerUpKind, SnakeCollision, SnakePhase, SnakeState};
use crate::consts::snake::*;
use crate::feedback::{Collision, FeedbackEvent};
use crate::highscores::{GameId, Scoreboard};

/// Advance the snake by one step
pub fn tick(state: &mut SnakeState, scores: &mut dyn Scoreboard) {
    if state.phase != SnakePhase::Running {
        return;
    }
    state.time_ticks += 1;

    // Heading
    state.heading = state.pending_heading;

    // Movement
    let head = state.head().step(state.heading);

    // Collision
    if let Some(cause) = collision_at(state, head) {
        end_run(state, cause, scores);
        return;
    }

    decay_power_up(state, head);

    // Resolution
    state.body.push_front(head);
    if state.food == Some(head) {
        eat_food(state);
    } else if let Some(power_up) = state.power_up.filter(|p| p.cell == head) {
        state.power_up = None;
        collect_power_up(state, power_up);
        state.body.pop_back();
    } else {
        state.body.pop_back();
    }
}

/// Wall, then body, then obstacles
fn collision_at(state: &SnakeState, head: Cell) -> Option<SnakeCollision> {
    if !head.in_bounds() {
        Some(SnakeCollision::Wall)
    } else if state.body.contains(&head) {
        Some(SnakeCollision::SelfHit)
    } else if state.obstacles.contains(&head) {
        Some(SnakeCollision::Obstacle)
    } else {
        None
    }
}

fn end_run(state: &mut SnakeState, cause: SnakeCollision, scores: &mut dyn Scoreboard) {
    state.phase = SnakePhase::GameOver;
    let score = u64::from(state.score);
    let new_record = scores.submit(GameId::Snake, score);
    log::info!(
        "Snake run ended: {:?} at score {}{}",
        cause,
        score,
        if new_record { " (new record)" } else { "" }
    );
    state.events.push(FeedbackEvent::RunEnded {
        cause: Collision::Snake(cause),
        score,
        new_record,
    });
}

/// Tick down an uncollected power-up
fn decay_power_up(state: &mut SnakeState, head: Cell) {
    let Some(power_up) = state.power_up.as_mut() else {
        return;
    };
    if power_up.cell == head {
        return;
    }
    power_up.ticks_left = power_up.ticks_left.saturating_sub(1);
    if power_up.ticks_left == 0 {
        state.power_up = None;
        state.events.push(FeedbackEvent::PowerUpExpired);
    }
}

/// Grow (tail kept), respawn food, rebuild obstacles, speed up
fn eat_food(state: &mut SnakeState) {
    state.score += 1;
    state.events.push(FeedbackEvent::AteFood {
        score: u64::from(state.score),
    });

    state.spawn_food();
    state.regenerate_obstacles();
    state.speed_up(FOOD_SPEEDUP_MS);
    maybe_spawn_power_up(state);
}

fn collect_power_up(state: &mut SnakeState, power_up: PowerUp) {
    match power_up.kind {
        PowerUpKind::Speed => state.speed_up(POWERUP_SPEEDUP_MS),
        PowerUpKind::Points => state.score += POWERUP_BONUS,
    }
    log::debug!("Power-up {:?} collected", power_up.kind);
    state.events.push(FeedbackEvent::PowerUpCollected {
        kind: power_up.kind,
        score: u64::from(state.score),
    });
}

fn maybe_spawn_power_up(state: &mut SnakeState) {
    if state.power_up.is_some() || state.score <= POWERUP_SCORE_THRESHOLD {
        return;
    }
    if !state.rng.random_bool(POWERUP_SPAWN_CHANCE) {
        return;
    }
    let kind = if state.rng.random_bool(0.5) {
        PowerUpKind::Speed
    } else {
        PowerUpKind::Points
    };
    if let Some(cell) = state.random_free_cell() {
        state.power_up = Some(PowerUp {
            cell,
            kind,
            ticks_left: POWERUP_LIFETIME_TICKS,
        });
    }
}
