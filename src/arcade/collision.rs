//! Collision detection and response for the rectangular playfield
//!
//! Walls and the paddle only reflect a ball that is moving into them, so a
//! ball that is still overlapping on the next tick is never flipped back.
//! No sub-stepping: a fast ball can tunnel through thin geometry.

use glam::Vec2;

use super::state::{Ball, Brick, Paddle};
use crate::consts::PADDLE_HEIGHT;

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce off the left, right and top edges. Returns true if anything reflected.
///
/// The bottom edge never reflects; see [`fell_out`].
pub fn bounce_off_walls(ball: &mut Ball, field_width: f32) -> bool {
    let mut bounced = false;

    if (ball.pos.x <= 0.0 && ball.vel.x < 0.0) || (ball.pos.x >= field_width && ball.vel.x > 0.0) {
        ball.vel = reflect_velocity(ball.vel, Vec2::X);
        bounced = true;
    }

    if ball.pos.y <= 0.0 && ball.vel.y < 0.0 {
        ball.vel = reflect_velocity(ball.vel, Vec2::Y);
        bounced = true;
    }

    bounced
}

/// Ball is inside the paddle's vertical band and horizontal span
pub fn paddle_contact(ball: &Ball, paddle: &Paddle) -> bool {
    let band_top = paddle.y - PADDLE_HEIGHT / 2.0 - ball.radius;
    let band_bottom = paddle.y + PADDLE_HEIGHT / 2.0;

    ball.pos.y >= band_top
        && ball.pos.y <= band_bottom
        && ball.pos.x >= paddle.left()
        && ball.pos.x <= paddle.right()
}

/// Ball's bounding box overlaps an active brick
pub fn brick_contact(ball: &Ball, brick: &Brick) -> bool {
    if !brick.active {
        return false;
    }
    let delta = (ball.pos - brick.center).abs();
    delta.x < brick.size.x / 2.0 + ball.radius && delta.y < brick.size.y / 2.0 + ball.radius
}

/// Ball has left through the bottom edge
pub fn fell_out(ball: &Ball, field_height: f32) -> bool {
    ball.pos.y > field_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcade::state::BrickKind;

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_side_wall_only_reflects_inbound() {
        let mut ball = Ball::new(Vec2::new(391.0, 100.0), Vec2::new(2.0, 1.0));
        assert!(bounce_off_walls(&mut ball, 390.0));
        assert_eq!(ball.vel, Vec2::new(-2.0, 1.0));

        // Still past the edge but already heading back
        assert!(!bounce_off_walls(&mut ball, 390.0));
        assert_eq!(ball.vel, Vec2::new(-2.0, 1.0));

        let mut ball = Ball::new(Vec2::new(-1.0, 100.0), Vec2::new(-2.0, 1.0));
        assert!(bounce_off_walls(&mut ball, 390.0));
        assert_eq!(ball.vel.x, 2.0);
    }

    #[test]
    fn test_corner_reflects_both_axes() {
        let mut ball = Ball::new(Vec2::new(0.0, 0.0), Vec2::new(-2.0, -2.0));
        assert!(bounce_off_walls(&mut ball, 390.0));
        assert_eq!(ball.vel, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_bottom_does_not_reflect() {
        let mut ball = Ball::new(Vec2::new(100.0, 900.0), Vec2::new(0.0, 2.0));
        assert!(!bounce_off_walls(&mut ball, 390.0));
        assert!(fell_out(&ball, 844.0));
        assert!(!fell_out(&Ball::new(Vec2::new(100.0, 844.0), Vec2::ZERO), 844.0));
    }

    #[test]
    fn test_paddle_band() {
        let paddle = Paddle::new(195.0, 100.0, 744.0);

        assert!(paddle_contact(&Ball::new(Vec2::new(195.0, 734.0), Vec2::ZERO), &paddle));
        assert!(paddle_contact(&Ball::new(Vec2::new(145.0, 740.0), Vec2::ZERO), &paddle));
        // Above the band
        assert!(!paddle_contact(&Ball::new(Vec2::new(195.0, 733.0), Vec2::ZERO), &paddle));
        // Below the paddle
        assert!(!paddle_contact(&Ball::new(Vec2::new(195.0, 750.0), Vec2::ZERO), &paddle));
        // Outside the span
        assert!(!paddle_contact(&Ball::new(Vec2::new(250.0, 740.0), Vec2::ZERO), &paddle));
    }

    #[test]
    fn test_brick_contact() {
        let mut brick = Brick::new(Vec2::new(100.0, 60.0), Vec2::new(50.0, 20.0), BrickKind::Normal);

        assert!(brick_contact(&Ball::new(Vec2::new(100.0, 70.0), Vec2::ZERO), &brick));
        assert!(brick_contact(&Ball::new(Vec2::new(129.0, 60.0), Vec2::ZERO), &brick));
        assert!(!brick_contact(&Ball::new(Vec2::new(100.0, 76.0), Vec2::ZERO), &brick));
        assert!(!brick_contact(&Ball::new(Vec2::new(131.0, 60.0), Vec2::ZERO), &brick));

        brick.active = false;
        assert!(!brick_contact(&Ball::new(Vec2::new(100.0, 60.0), Vec2::ZERO), &brick));
    }
}
