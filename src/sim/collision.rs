//! Collision detection and response for axis-aligned rectangles
//!
//! Everything here is pure geometry over [`Body`] values. Callers hand in
//! non-degenerate rectangles; nothing is checked at runtime.

use serde::{Deserialize, Serialize};

use super::body::Body;

/// Axis along which an overlap was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Outcome of [`resolve`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Axis of minimum penetration
    pub axis: Axis,
    /// Penetration depth along that axis before correction
    pub penetration: f32,
}

/// Strict AABB overlap test
///
/// Edge-touching rectangles do not overlap.
#[inline]
pub fn aabb_overlap(a: &Body, b: &Body) -> bool {
    a.x() < b.right() && a.right() > b.x() && a.y() < b.bottom() && a.bottom() > b.y()
}

/// Swept landing test
///
/// True when the body overlaps the platform horizontally and the platform top
/// lies between the body's bottom edge at the start and end of the tick.
/// Catches fast falls that would tunnel through a thin platform between two
/// discrete positions.
#[inline]
pub fn platform_landing(body: &Body, platform: &Body, prev_bottom: f32, new_bottom: f32) -> bool {
    let horizontal = body.x() < platform.right() && body.right() > platform.x();
    horizontal && platform.y() >= prev_bottom && platform.y() <= new_bottom
}

/// Push a dynamic body out of a static one along the cheapest axis
///
/// On the vertical axis a body coming from above is placed exactly on top of
/// the static body. Velocity along the resolved axis is reflected and scaled
/// by the dynamic body's restitution.
pub fn resolve(dynamic: &mut Body, fixed: &Body) -> Resolution {
    let overlap_x = if dynamic.x() < fixed.x() {
        dynamic.right() - fixed.x()
    } else {
        fixed.right() - dynamic.x()
    };
    let overlap_y = if dynamic.y() < fixed.y() {
        dynamic.bottom() - fixed.y()
    } else {
        fixed.bottom() - dynamic.y()
    };

    if overlap_x < overlap_y {
        if dynamic.x() < fixed.x() {
            dynamic.pos.x = fixed.x() - dynamic.width();
        } else {
            dynamic.pos.x = fixed.right();
        }
        dynamic.vel.x = -dynamic.vel.x * dynamic.restitution;
        Resolution {
            axis: Axis::X,
            penetration: overlap_x,
        }
    } else {
        if dynamic.y() < fixed.y() {
            land_on_top(dynamic, fixed.y());
        } else {
            dynamic.pos.y = fixed.bottom();
            dynamic.vel.y = -dynamic.vel.y * dynamic.restitution;
        }
        Resolution {
            axis: Axis::Y,
            penetration: overlap_y,
        }
    }
}

/// Rest a body on a surface at `top`, reflecting vertical velocity
#[inline]
pub fn land_on_top(body: &mut Body, top: f32) {
    body.pos.y = top - body.height();
    body.vel.y = -body.vel.y * body.restitution;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Body {
        Body::new(x, y, w, h)
    }

    #[test]
    fn test_overlap_and_edge_touching() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(aabb_overlap(&a, &rect(5.0, 5.0, 10.0, 10.0)));
        assert!(!aabb_overlap(&a, &rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!aabb_overlap(&a, &rect(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_landing_scenario() {
        // Player after integration: vy = 10, bottom moved from 570 to 580
        let player = rect(100.0, 500.0, 80.0, 80.0).with_velocity(0.0, 10.0);
        let platform = rect(50.0, 580.0, 200.0, 20.0);
        let prev_bottom = player.bottom() - player.vel.y;
        assert_eq!(prev_bottom, 570.0);
        assert!(platform_landing(&player, &platform, prev_bottom, player.bottom()));
    }

    #[test]
    fn test_landing_catches_tunneling() {
        // Bottom edge went from 630 to 750 and skipped the 20px platform
        let player = rect(100.0, 670.0, 80.0, 80.0).with_velocity(0.0, 120.0);
        let platform = rect(50.0, 640.0, 200.0, 20.0);
        assert!(!aabb_overlap(&player, &platform));
        assert!(platform_landing(&player, &platform, 630.0, 750.0));
    }

    #[test]
    fn test_landing_requires_horizontal_overlap() {
        let player = rect(300.0, 500.0, 80.0, 80.0);
        let platform = rect(50.0, 580.0, 200.0, 20.0);
        assert!(!platform_landing(&player, &platform, 570.0, 580.0));
    }

    #[test]
    fn test_landing_ignores_platform_below_sweep() {
        let player = rect(100.0, 500.0, 80.0, 80.0);
        let platform = rect(50.0, 600.0, 200.0, 20.0);
        assert!(!platform_landing(&player, &platform, 570.0, 580.0));
    }

    #[test]
    fn test_resolve_from_above_snaps_on_top() {
        let mut player = rect(100.0, 505.0, 80.0, 80.0).with_velocity(0.0, 10.0);
        let platform = rect(50.0, 580.0, 200.0, 20.0);
        let res = resolve(&mut player, &platform);
        assert_eq!(res.axis, Axis::Y);
        assert_eq!(player.pos.y, 500.0);
        assert_eq!(player.vel.y, 0.0);

        let mut landed = rect(100.0, 505.0, 80.0, 80.0).with_velocity(0.0, 10.0);
        land_on_top(&mut landed, platform.y());
        assert_eq!(landed, player);
    }

    #[test]
    fn test_resolve_from_side() {
        let mut body = rect(0.0, 0.0, 10.0, 100.0).with_velocity(5.0, 0.0);
        let wall = rect(8.0, 0.0, 50.0, 100.0);
        let res = resolve(&mut body, &wall);
        assert_eq!(res.axis, Axis::X);
        assert_eq!(res.penetration, 2.0);
        assert_eq!(body.pos.x, -2.0);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_resolve_applies_restitution() {
        let mut ball = rect(0.0, 95.0, 10.0, 10.0).with_velocity(0.0, 20.0);
        ball.restitution = 0.5;
        let floor = rect(-100.0, 100.0, 300.0, 50.0);
        resolve(&mut ball, &floor);
        assert_eq!(ball.pos.y, 90.0);
        assert_eq!(ball.vel.y, -10.0);
    }

    #[test]
    fn test_resolve_from_below() {
        let mut body = rect(20.0, 45.0, 10.0, 10.0).with_velocity(0.0, -8.0);
        let ceiling = rect(0.0, 0.0, 100.0, 50.0);
        resolve(&mut body, &ceiling);
        assert_eq!(body.pos.y, 50.0);
        assert_eq!(body.vel.y, 0.0);
    }

    fn arb_rect() -> impl Strategy<Value = Body> {
        (-500i32..500, -500i32..500, 1i32..200, 1i32..200)
            .prop_map(|(x, y, w, h)| rect(x as f32, y as f32, w as f32, h as f32))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            max_global_rejects: 100_000,
            ..ProptestConfig::default()
        })]

        #[test]
        fn prop_overlap_is_symmetric(a in arb_rect(), b in arb_rect()) {
            prop_assert_eq!(aabb_overlap(&a, &b), aabb_overlap(&b, &a));
        }

        #[test]
        fn prop_resolve_separates(a in arb_rect(), b in arb_rect(), vy in -50i32..50) {
            prop_assume!(aabb_overlap(&a, &b));
            let mut dynamic = a.with_velocity(0.0, vy as f32);
            resolve(&mut dynamic, &b);
            prop_assert!(!aabb_overlap(&dynamic, &b));
        }

        #[test]
        fn prop_inelastic_resolve_zeroes_velocity(a in arb_rect(), b in arb_rect(), v in -50i32..50) {
            prop_assume!(aabb_overlap(&a, &b));
            let mut dynamic = a.with_velocity(v as f32, v as f32);
            let res = resolve(&mut dynamic, &b);
            match res.axis {
                Axis::X => prop_assert_eq!(dynamic.vel.x, 0.0),
                Axis::Y => prop_assert_eq!(dynamic.vel.y, 0.0),
            }
        }
    }
}
