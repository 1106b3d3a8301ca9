//! Game state and core simulation types
//!
//! Everything a run needs lives here, owned by a single `GameState`. The state
//! is serializable so two runs can be compared snapshot by snapshot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::world::WorldGenerator;
use crate::consts::*;
use crate::settings::{Settings, SettingsError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Player fell below the viewport. Final.
    GameOver,
}

/// A platform the player can land on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Removed on first landing contact, no bounce
    pub breakable: bool,
    /// Oscillates horizontally between the viewport edges
    pub moving: bool,
    /// +1 right, -1 left
    pub direction: f32,
    /// Pixels per tick while moving
    pub speed: f32,
    /// Difficulty tier the platform was spawned in (1..=3)
    pub spawn_level: u8,
}

impl Platform {
    /// Transient body standing in for this platform in collision tests
    pub fn body(&self) -> Body {
        Body::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Advance a moving platform one tick, bouncing off `[0, width]`
    pub fn advance(&mut self, width: f32) {
        if !self.moving {
            return;
        }
        self.pos.x += self.speed * self.direction;
        if self.pos.x <= 0.0 {
            self.pos.x = 0.0;
            self.direction = 1.0;
        } else if self.right() >= width {
            self.pos.x = width - self.size.x;
            self.direction = -1.0;
        }
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Adds one to the collected coin counter
    Coin,
    /// Launches the player upward with the boost impulse
    Boost,
}

/// A pickup entity, square
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub size: f32,
}

impl Pickup {
    pub fn body(&self) -> Body {
        Body::new(self.pos.x, self.pos.y, self.size, self.size)
    }
}

/// Something that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Bounced off a solid platform
    Landed { platform_id: u32 },
    /// Fell onto a breakable platform, which is now gone
    PlatformBroken { platform_id: u32 },
    CoinCollected { total: u32 },
    BoostTaken,
    LevelUp { level: u8 },
    GameOver { score: u64, coins: u32 },
}

/// Background panels stacked behind the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backdrop {
    Sky,
    /// One-time panel bridging into level 2
    Dusk,
    Night,
    /// One-time panel bridging into level 3
    Orbit,
    Space,
}

/// Presentation-only backdrop bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackdropState {
    /// Parallax offset, advances at half the world scroll
    pub offset: f32,
    pub dusk_added: bool,
    pub orbit_added: bool,
}

/// Level for a score
pub fn level_for_score(score: f32) -> u8 {
    if score >= LEVEL_3_SCORE {
        3
    } else if score >= LEVEL_2_SCORE {
        2
    } else {
        1
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Cumulative upward displacement in pixels, never decreases
    pub score: f32,
    /// Current level (1..=3)
    pub level: u8,
    pub coins: u32,
    pub player: Body,
    pub world: WorldGenerator,
    /// World scroll applied during the last tick
    pub last_offset: f32,
    pub backdrop: BackdropState,
    /// Events from the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run with the given seed
    ///
    /// Fails fast when the settings cannot drive a simulation.
    pub fn new(seed: u64, settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let viewport = settings.viewport;
        let physics = settings.physics;
        let size = physics.player_size;

        let mut player = Body::new(
            (viewport.width - size) / 2.0,
            viewport.height - PLAYER_SPAWN_LIFT,
            size,
            size,
        )
        .with_velocity(0.0, physics.jump_impulse);
        player.mass = physics.player_mass;
        player.restitution = physics.player_restitution;

        let world = WorldGenerator::new(seed, viewport, settings.generation, &player);

        log::info!(
            "New run: seed={}, viewport={}x{}, platforms={}",
            seed,
            viewport.width,
            viewport.height,
            world.platforms.len()
        );

        Ok(Self {
            seed,
            settings: settings.clone(),
            phase: GamePhase::Running,
            time_ticks: 0,
            score: 0.0,
            level: 1,
            coins: 0,
            player,
            world,
            last_offset: 0.0,
            backdrop: BackdropState::default(),
            events: Vec::new(),
        })
    }

    /// Whole-pixel score reported to the outside
    #[inline]
    pub fn final_score(&self) -> u64 {
        self.score.max(0.0) as u64
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Pick the next background panel to stack above the current ones
    ///
    /// Each level transition shows its bridging panel exactly once.
    pub fn next_backdrop(&mut self) -> Backdrop {
        match self.level {
            1 => Backdrop::Sky,
            2 => {
                if !self.backdrop.dusk_added {
                    self.backdrop.dusk_added = true;
                    Backdrop::Dusk
                } else {
                    Backdrop::Night
                }
            }
            _ => {
                if !self.backdrop.orbit_added {
                    self.backdrop.orbit_added = true;
                    Backdrop::Orbit
                } else {
                    Backdrop::Space
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_spawns_player_above_start_platform() {
        let settings = Settings::default();
        let state = GameState::new(7, &settings).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.level, 1);
        assert_eq!(state.player.vel.y, settings.physics.jump_impulse);
        assert_eq!(
            state.player.pos.x,
            (settings.viewport.width - settings.physics.player_size) / 2.0
        );
        // Something to stand on directly under the spawn point
        let under = state.world.platforms.iter().any(|p| {
            p.pos.y == state.player.bottom()
                && p.pos.x < state.player.right()
                && p.right() > state.player.x()
        });
        assert!(under);
    }

    #[test]
    fn test_new_state_rejects_invalid_settings() {
        let mut settings = Settings::default();
        settings.viewport.width = -5.0;
        assert!(GameState::new(1, &settings).is_err());

        // Gaps that shrink to nothing would stall the generator at level 3
        let mut settings = Settings::default();
        settings.generation.gap_growth = -1.0;
        assert!(matches!(
            GameState::new(1, &settings),
            Err(SettingsError::InvalidGapGrowth(_))
        ));
    }

    #[test]
    fn test_level_for_score() {
        assert_eq!(level_for_score(0.0), 1);
        assert_eq!(level_for_score(9_999.0), 1);
        assert_eq!(level_for_score(10_000.0), 2);
        assert_eq!(level_for_score(39_999.0), 2);
        assert_eq!(level_for_score(40_000.0), 3);
    }

    #[test]
    fn test_moving_platform_bounces_off_edges() {
        let mut p = Platform {
            id: 1,
            pos: Vec2::new(998.0, 100.0),
            size: Vec2::new(80.0, 20.0),
            breakable: false,
            moving: true,
            direction: 1.0,
            speed: 4.0,
            spawn_level: 1,
        };
        p.advance(1080.0);
        assert_eq!(p.pos.x, 1000.0);
        assert_eq!(p.direction, -1.0);
        p.advance(1080.0);
        assert_eq!(p.pos.x, 996.0);

        p.pos.x = 2.0;
        p.advance(1080.0);
        assert_eq!(p.pos.x, 0.0);
        assert_eq!(p.direction, 1.0);
    }

    #[test]
    fn test_backdrop_sequence() {
        let mut state = GameState::new(3, &Settings::default()).unwrap();
        assert_eq!(state.next_backdrop(), Backdrop::Sky);
        state.level = 2;
        assert_eq!(state.next_backdrop(), Backdrop::Dusk);
        assert_eq!(state.next_backdrop(), Backdrop::Night);
        state.level = 3;
        assert_eq!(state.next_backdrop(), Backdrop::Orbit);
        assert_eq!(state.next_backdrop(), Backdrop::Space);
    }
}
