//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::body::integrate;
use super::collision::{aabb_overlap, land_on_top, platform_landing};
use super::state::{GameEvent, GamePhase, GameState, PickupKind};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Normalized device tilt, scaled by the tilt sensitivity
    pub tilt: f32,
    /// Touch steering, used as-is
    pub touch: f32,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    let physics = state.settings.physics;
    let viewport = state.settings.viewport;

    // Horizontal steering, then gravity
    state.player.vel.x = input.tilt * physics.tilt_sensitivity + input.touch;
    integrate(&mut state.player, physics.gravity, dt);

    // Rising past the threshold scrolls the world instead of the player
    let threshold = viewport.scroll_threshold();
    let offset = if state.player.pos.y < threshold {
        let offset = threshold - state.player.pos.y;
        state.player.pos.y = threshold;
        state.score += offset;
        offset
    } else {
        0.0
    };
    state.last_offset = offset;

    state.world.update(offset, state.score);
    state.backdrop.offset += offset * BACKDROP_PARALLAX;

    // Wrap around the side edges
    if state.player.x() > viewport.width {
        state.player.pos.x = 0.0;
    } else if state.player.right() < 0.0 {
        state.player.pos.x = viewport.width - state.player.width();
    }

    check_platform_landings(state, dt);
    check_pickups(state);
    check_level_transition(state);

    if state.player.y() > viewport.height {
        state.phase = GamePhase::GameOver;
        let score = state.final_score();
        log::info!(
            "Game over after {} ticks: score={}, coins={}, level={}",
            state.time_ticks,
            score,
            state.coins,
            state.level
        );
        state.events.push(GameEvent::GameOver {
            score,
            coins: state.coins,
        });
    }
}

/// Swept landing against every platform while falling
///
/// Breakable platforms crumble without a bounce. The first solid platform
/// crossed ends the scan with an auto-jump.
fn check_platform_landings(state: &mut GameState, dt: f32) {
    if state.player.vel.y <= 0.0 {
        return;
    }

    let new_bottom = state.player.bottom();
    let prev_bottom = new_bottom - state.player.vel.y * dt;

    let mut i = 0;
    while i < state.world.platforms.len() {
        let platform = &state.world.platforms[i];
        if !platform_landing(&state.player, &platform.body(), prev_bottom, new_bottom) {
            i += 1;
            continue;
        }

        if platform.breakable {
            let broken = state.world.remove_platform(i);
            state.events.push(GameEvent::PlatformBroken {
                platform_id: broken.id,
            });
            // swap_remove moved another platform into slot i
            continue;
        }

        let (platform_id, top) = (platform.id, platform.pos.y);
        // Vertical branch of `resolve` from above; with restitution 0 this zeroes vy
        land_on_top(&mut state.player, top);
        state.player.vel.y = state.settings.physics.jump_impulse;
        state.events.push(GameEvent::Landed { platform_id });
        break;
    }
}

/// Plain AABB test against coins and boosts
fn check_pickups(state: &mut GameState) {
    let mut i = 0;
    while i < state.world.pickups.len() {
        if !aabb_overlap(&state.player, &state.world.pickups[i].body()) {
            i += 1;
            continue;
        }

        let pickup = state.world.remove_pickup(i);
        match pickup.kind {
            PickupKind::Coin => {
                state.coins += 1;
                state.events.push(GameEvent::CoinCollected { total: state.coins });
            }
            PickupKind::Boost => {
                state.player.vel.y = state.settings.physics.boost_impulse;
                state.events.push(GameEvent::BoostTaken);
            }
        }
    }
}

/// Step the level forward when a score threshold is crossed
///
/// At most one step per tick. Each step re-arms that level's one-time backdrop.
fn check_level_transition(state: &mut GameState) {
    if state.score >= LEVEL_2_SCORE && state.level == 1 {
        state.level = 2;
        state.backdrop.dusk_added = false;
    } else if state.score >= LEVEL_3_SCORE && state.level == 2 {
        state.level = 3;
        state.backdrop.orbit_added = false;
    } else {
        return;
    }

    log::info!("Level {} reached at score {:.0}", state.level, state.score);
    state.events.push(GameEvent::LevelUp { level: state.level });
}
