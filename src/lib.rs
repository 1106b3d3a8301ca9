//! Skyhop - simulation core for a vertically scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, world generation, tick)
//! - `session`: Drives ticks, samples input, reports game over
//! - `collaborator`: Interface to the outside world (scores, cosmetics, input)
//! - `leaderboard`: In-memory scores and coin wallet
//! - `settings`: Data-driven game balance
//! - `autopilot`: Demo input for headless runs

pub mod autopilot;
pub mod collaborator;
pub mod leaderboard;
pub mod session;
pub mod settings;
pub mod sim;

pub use collaborator::{Collaborator, ControlInput, ControlSource, Cosmetic, InputLatch};
pub use leaderboard::Leaderboard;
pub use session::{Session, SessionEnd, SessionOutcome, StopHandle};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
///
/// Velocities and accelerations are per tick, the simulation runs with a
/// unit timestep.
pub mod consts {
    /// One simulation step
    pub const TICK_DT: f32 = 1.0;
    /// Nominal tick rate when driven from wall-clock time
    pub const TICKS_PER_SECOND: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player defaults
    pub const GRAVITY: f32 = 2.0;
    pub const JUMP_IMPULSE: f32 = -60.0;
    pub const BOOST_IMPULSE: f32 = -100.0;
    pub const TILT_SENSITIVITY: f32 = 4.0;
    pub const PLAYER_SIZE: f32 = 80.0;
    /// Player spawns this far above the viewport bottom
    pub const PLAYER_SPAWN_LIFT: f32 = 180.0;

    /// Score thresholds for level 2 and level 3
    pub const LEVEL_2_SCORE: f32 = 10_000.0;
    pub const LEVEL_3_SCORE: f32 = 40_000.0;

    /// Backdrop scrolls at half the world speed
    pub const BACKDROP_PARALLAX: f32 = 0.5;
}
