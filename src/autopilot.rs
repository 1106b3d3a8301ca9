//! Demo/idle steering
//!
//! Picks a platform to aim for and steers toward its center the way a finger
//! on the touch screen would. Good enough to climb a few levels in headless
//! runs, not a solver.

use crate::collaborator::ControlInput;
use crate::sim::{GameState, Platform};

/// Strongest touch steering the autopilot will apply
pub const MAX_TOUCH: f32 = 20.0;

/// Touch response per pixel of horizontal error
const GAIN: f32 = 0.125;

/// Choose a landing target for the current state
///
/// Rising: the lowest solid platform still within the remaining rise.
/// Falling: the highest solid platform below the feet.
pub fn target_platform(state: &GameState) -> Option<&Platform> {
    let player = &state.player;
    let gravity = state.settings.physics.gravity;
    let feet = player.bottom();

    let solid = state.world.platforms.iter().filter(|p| !p.breakable);
    if player.vel.y < 0.0 {
        let rise = player.vel.y * player.vel.y / (2.0 * gravity);
        solid
            .filter(|p| p.pos.y < feet && p.pos.y >= feet - rise)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
    } else {
        solid
            .filter(|p| p.pos.y >= feet)
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
    }
}

/// Touch input that steers toward the target platform
pub fn steer(state: &GameState) -> ControlInput {
    let target_x = match target_platform(state) {
        Some(platform) => platform.center_x(),
        None => state.settings.viewport.width / 2.0,
    };
    let error = target_x - state.player.center_x();
    ControlInput {
        tilt: 0.0,
        touch: (error * GAIN).clamp(-MAX_TOUCH, MAX_TOUCH),
    }
}
