//! Fixed timestep simulation tick
//!
//! Advances an arcade session by one tick and reports what happened.
//! Balls are processed in order, each one through the same pipeline:
//! integrate, walls, paddle, bricks, bottom edge.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{bounce_off_walls, brick_contact, fell_out, paddle_contact, reflect_velocity};
use super::state::{ArcadeMode, ArcadeSession, ArcadeStatus, Ball, BrickKind};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Target paddle centre (from drag/pointer position)
    pub paddle_target: Option<f32>,
}

/// Something that happened during a tick, for sound and presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcadeEvent {
    /// Ball reflected off a side or top wall
    WallBounce,
    /// Ball reflected off the paddle
    Bounce,
    BrickDestroyed { index: usize, kind: BrickKind },
    /// A bomb brick ended the run
    Explosion { index: usize },
    MultiBallSpawned { count: usize },
    /// Ball at `index` (pre-tick order) left through the bottom
    BallLost { index: usize },
    /// The last ball is gone; the run is over
    AllBallsLost,
    LevelCleared { new_level: u32 },
    /// Level transition finished, play resumes
    LevelStarted { level: u32 },
}

/// Advance the session by one fixed tick.
///
/// `dt` scales integration (`TICK_SCALE` for a nominal tick); it is not
/// wall-clock time. A finished session is left untouched.
pub fn advance<R: Rng + ?Sized>(
    session: &mut ArcadeSession,
    input: &TickInput,
    dt: f32,
    rng: &mut R,
) -> Vec<ArcadeEvent> {
    let mut events = Vec::new();

    if session.status == ArcadeStatus::GameOver {
        return events;
    }

    if let Some(target) = input.paddle_target {
        session.set_paddle_target(target);
    }

    session.time_ticks += 1;

    match session.status {
        ArcadeStatus::Playing => tick_playing(session, dt, rng, &mut events),
        ArcadeStatus::LevelTransition => {
            session.transition_ticks = session.transition_ticks.saturating_sub(1);
            if session.transition_ticks == 0 {
                session.status = ArcadeStatus::Playing;
                events.push(ArcadeEvent::LevelStarted {
                    level: session.level,
                });
            }
        }
        ArcadeStatus::GameOver => {}
    }

    events
}

fn tick_playing<R: Rng + ?Sized>(
    session: &mut ArcadeSession,
    dt: f32,
    rng: &mut R,
    events: &mut Vec<ArcadeEvent>,
) {
    let width = session.config.width;
    let height = session.config.height;
    let ball_count = session.balls.len();

    // Deferred so that balls spawned this tick are not simulated this tick
    let mut pending_spawns = 0usize;
    let mut lost: Vec<usize> = Vec::new();

    for i in 0..ball_count {
        let ball = &mut session.balls[i];

        ball.pos += ball.vel * dt;

        if bounce_off_walls(ball, width) {
            events.push(ArcadeEvent::WallBounce);
        }

        if ball.vel.y > 0.0 && paddle_contact(ball, &session.paddle) {
            ball.vel = reflect_velocity(ball.vel, Vec2::Y);
            events.push(ArcadeEvent::Bounce);
            if session.mode == ArcadeMode::Pong {
                session.score += PONG_RETURN_SCORE;
            }
        }

        let mut hit_any = false;
        let mut multiball_hits = 0usize;
        let mut detonated = None;
        for (index, brick) in session.bricks.iter_mut().enumerate() {
            if !brick_contact(ball, brick) {
                continue;
            }
            brick.active = false;
            hit_any = true;
            session.score += BRICK_SCORE;
            events.push(ArcadeEvent::BrickDestroyed {
                index,
                kind: brick.kind,
            });
            match brick.kind {
                BrickKind::Bomb => {
                    detonated = Some(index);
                    break;
                }
                BrickKind::MultiBall => multiball_hits += 1,
                BrickKind::Normal => {}
            }
        }
        // One reflection per tick, however many bricks were hit
        if hit_any {
            ball.vel = reflect_velocity(ball.vel, Vec2::Y);
        }

        if let Some(index) = detonated {
            session.status = ArcadeStatus::GameOver;
            events.push(ArcadeEvent::Explosion { index });
            log::info!("Bomb brick {} detonated, game over (score {})", index, session.score);
            return;
        }

        // Each MultiBall hit doubles whatever is alive at that moment
        for _ in 0..multiball_hits {
            let alive = ball_count - lost.len() + pending_spawns;
            pending_spawns += alive;
        }

        if fell_out(ball, height) {
            lost.push(i);
            events.push(ArcadeEvent::BallLost { index: i });
        }
    }

    if !lost.is_empty() {
        let mut index = 0;
        session.balls.retain(|_| {
            let keep = !lost.contains(&index);
            index += 1;
            keep
        });
    }

    if pending_spawns > 0 {
        let launch = session.config.launch_point();
        for _ in 0..pending_spawns {
            session.balls.push(spawn_multiball(launch, rng));
        }
        events.push(ArcadeEvent::MultiBallSpawned {
            count: pending_spawns,
        });
        log::debug!("MultiBall: {} balls in play", session.balls.len());
    }

    if session.balls.is_empty() {
        session.status = ArcadeStatus::GameOver;
        events.push(ArcadeEvent::AllBallsLost);
        log::info!("All balls lost, game over (score {})", session.score);
        return;
    }

    let cleared = session.mode == ArcadeMode::Breakout
        && !session.bricks.is_empty()
        && session.bricks.iter().all(|b| !b.active);
    if cleared {
        let new_level = session.level + 1;
        session.start_level(new_level, rng);
        session.status = ArcadeStatus::LevelTransition;
        session.transition_ticks = LEVEL_TRANSITION_TICKS;
        events.push(ArcadeEvent::LevelCleared { new_level });
        log::info!("Level cleared, advancing to level {} (score {})", new_level, session.score);
    }
}

/// Extra ball from the launch point: random horizontal speed, fixed downward speed
fn spawn_multiball<R: Rng + ?Sized>(launch: Vec2, rng: &mut R) -> Ball {
    let speed = rng.random_range(1.0..=MULTIBALL_MAX_VX);
    let vx = if rng.random_bool(0.5) { speed } else { -speed };
    Ball::new(launch, Vec2::new(vx, BALL_SPEED))
}
