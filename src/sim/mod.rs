//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, I/O or platform dependencies

pub mod body;
pub mod collision;
pub mod state;
pub mod tick;
pub mod world;

pub use body::{Body, integrate};
pub use collision::{Axis, Resolution, aabb_overlap, platform_landing, resolve};
pub use state::{
    Backdrop, GameEvent, GamePhase, GameState, Pickup, PickupKind, Platform, level_for_score,
};
pub use tick::{TickInput, tick};
pub use world::{DifficultyTier, WorldGenerator, difficulty_multiplier, min_platform_count};
