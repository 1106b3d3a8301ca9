//! Rectangular rigid bodies
//!
//! A body is an axis-aligned rectangle in world pixels:
//! - pos: top-left corner (y grows downward)
//! - size: width, height (both > 0)
//! - vel: velocity in pixels per tick

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A rectangular physical entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    /// Bounce factor applied on collision resolution (0 = inelastic)
    pub restitution: f32,
}

impl Body {
    /// Static, inelastic body at rest
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0, "degenerate body");
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
            vel: Vec2::ZERO,
            mass: 1.0,
            restitution: 0.0,
        }
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.vel = Vec2::new(vx, vy);
        self
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Horizontal center line
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// Advance a body by one step under constant vertical acceleration
///
/// Velocity is updated before position (semi-implicit Euler). No clamping:
/// callers handle scroll thresholds and screen bounds.
#[inline]
pub fn integrate(body: &mut Body, gravity: f32, dt: f32) {
    body.vel.y += gravity * dt;
    body.pos.y += body.vel.y * dt;
    body.pos.x += body.vel.x * dt;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_edges() {
        let b = Body::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.right(), 40.0);
        assert_eq!(b.bottom(), 60.0);
        assert_eq!(b.center_x(), 25.0);
    }

    #[test]
    fn test_integrate_applies_gravity_before_position() {
        let mut b = Body::new(0.0, 100.0, 10.0, 10.0).with_velocity(3.0, 8.0);
        integrate(&mut b, 2.0, 1.0);
        assert_eq!(b.vel.y, 10.0);
        assert_eq!(b.pos.y, 110.0);
        assert_eq!(b.pos.x, 3.0);
    }

    #[test]
    fn test_integrate_scales_with_dt() {
        let mut b = Body::new(0.0, 0.0, 10.0, 10.0).with_velocity(4.0, 0.0);
        integrate(&mut b, 2.0, 0.5);
        assert_eq!(b.vel.y, 1.0);
        assert_eq!(b.pos.y, 0.5);
        assert_eq!(b.pos.x, 2.0);
    }
}
