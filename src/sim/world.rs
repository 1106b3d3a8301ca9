//! Procedural world generation
//!
//! Keeps enough platforms on and just above the screen for the player to
//! climb forever. New platforms are always stacked above the current topmost
//! one, so each generated gap is bounded by `max_gap * difficulty_multiplier`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::state::{Pickup, PickupKind, Platform, level_for_score};
use crate::consts::*;
use crate::settings::{Generation, Viewport};

/// Spawn rules for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyTier {
    pub level: u8,
    pub min_platforms: usize,
    pub moving_chance: f32,
    pub breakable_chance: f32,
    /// Scales moving platform speed
    pub speed_multiplier: f32,
}

impl DifficultyTier {
    pub fn for_score(score: f32) -> Self {
        match level_for_score(score) {
            1 => {
                let thinning = (score.max(0.0) / 300.0).floor() as usize;
                Self {
                    level: 1,
                    min_platforms: 10usize.saturating_sub(thinning).max(2),
                    moving_chance: if score > 500.0 { 0.3 } else { 0.0 },
                    breakable_chance: if score > 800.0 { 0.1 } else { 0.0 },
                    speed_multiplier: 1.0,
                }
            }
            2 => Self {
                level: 2,
                min_platforms: 5,
                moving_chance: 0.5,
                breakable_chance: if score >= 15_000.0 { 0.3 } else { 0.0 },
                speed_multiplier: 1.0,
            },
            _ => Self {
                level: 3,
                min_platforms: 3,
                moving_chance: 1.0,
                breakable_chance: 0.7,
                speed_multiplier: 1.5,
            },
        }
    }
}

/// Minimum number of live platforms at a score
pub fn min_platform_count(score: f32) -> usize {
    DifficultyTier::for_score(score).min_platforms
}

/// Gap scale at a score, ramps from 1 to `1 + growth` by level 3
pub fn difficulty_multiplier(score: f32, growth: f32) -> f32 {
    1.0 + growth * (score.max(0.0) / LEVEL_3_SCORE).min(1.0)
}

/// Owns every platform and pickup in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGenerator {
    viewport: Viewport,
    tuning: Generation,
    /// Live platforms, unordered
    pub platforms: Vec<Platform>,
    /// Live pickups, unordered
    pub pickups: Vec<Pickup>,
    rng: Pcg32,
    next_id: u32,
    /// Platforms spawned per difficulty level
    spawned_per_level: [u32; 3],
}

impl WorldGenerator {
    /// Create a world with a solid starting platform under `player`
    pub fn new(seed: u64, viewport: Viewport, tuning: Generation, player: &Body) -> Self {
        let mut world = Self {
            viewport,
            tuning,
            platforms: Vec::new(),
            pickups: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            spawned_per_level: [0; 3],
        };

        let max_x = viewport.width - tuning.platform_width;
        let x = (player.center_x() - tuning.platform_width / 2.0).clamp(0.0, max_x);
        let id = world.next_entity_id();
        world.platforms.push(Platform {
            id,
            pos: Vec2::new(x, player.bottom()),
            size: Vec2::new(tuning.platform_width, tuning.platform_height),
            breakable: false,
            moving: false,
            direction: 1.0,
            speed: 0.0,
            spawn_level: 1,
        });

        world.replenish(0.0);
        world
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Advance the world by one tick
    ///
    /// `offset` is how far the world scrolled down this tick. Returns the
    /// number of platforms spawned.
    pub fn update(&mut self, offset: f32, score: f32) -> usize {
        let width = self.viewport.width;
        for platform in &mut self.platforms {
            platform.advance(width);
        }

        if offset != 0.0 {
            for platform in &mut self.platforms {
                platform.pos.y += offset;
            }
            for pickup in &mut self.pickups {
                pickup.pos.y += offset;
            }
        }

        let height = self.viewport.height;
        self.platforms.retain(|p| p.pos.y <= height);
        self.pickups.retain(|p| p.pos.y <= height);

        self.replenish(score)
    }

    /// Smallest y among live platforms
    pub fn topmost_y(&self) -> Option<f32> {
        self.platforms
            .iter()
            .map(|p| p.pos.y)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Spawn platforms until the minimum count is met and the top is covered
    fn replenish(&mut self, score: f32) -> usize {
        let required = min_platform_count(score);
        let mut spawned = 0;
        loop {
            let top_covered = self
                .topmost_y()
                .is_some_and(|top| top <= self.tuning.top_margin);
            if self.platforms.len() >= required && top_covered {
                break;
            }
            self.spawn_platform(score);
            spawned += 1;
        }
        if spawned > 0 {
            log::debug!(
                "Spawned {} platforms at score {:.0} ({} live)",
                spawned,
                score,
                self.platforms.len()
            );
        }
        spawned
    }

    fn spawn_platform(&mut self, score: f32) {
        let tier = DifficultyTier::for_score(score);
        let t = self.tuning;
        let multiplier = difficulty_multiplier(score, t.gap_growth);

        let top = self.topmost_y().unwrap_or(self.viewport.height);
        let gap = self.rng.random_range(t.min_gap..=t.max_gap) * multiplier;
        let x = self
            .rng
            .random_range(0.0..=(self.viewport.width - t.platform_width));

        let moving = self.rng.random::<f32>() < tier.moving_chance;
        let breakable = self.rng.random::<f32>() < tier.breakable_chance;
        let (speed, direction) = if moving {
            let speed = self
                .rng
                .random_range(t.min_platform_speed..=t.max_platform_speed)
                * tier.speed_multiplier;
            let direction = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            (speed, direction)
        } else {
            (0.0, 1.0)
        };

        let id = self.next_entity_id();
        let platform = Platform {
            id,
            pos: Vec2::new(x, top - gap),
            size: Vec2::new(t.platform_width, t.platform_height),
            breakable,
            moving,
            direction,
            speed,
            spawn_level: tier.level,
        };
        self.spawned_per_level[(tier.level - 1) as usize] += 1;

        self.attach_pickup(&platform);
        self.platforms.push(platform);
    }

    /// Roll for a coin or boost above a fresh platform, never both
    fn attach_pickup(&mut self, platform: &Platform) {
        let t = self.tuning;
        let coin = self.rng.random::<f32>() < t.coin_chance;
        let boost = self.rng.random::<f32>() < t.boost_chance;

        let kind = match (coin, boost) {
            (false, false) => return,
            (true, false) => PickupKind::Coin,
            (false, true) => PickupKind::Boost,
            (true, true) => {
                if self.rng.random_bool(0.5) {
                    PickupKind::Coin
                } else {
                    PickupKind::Boost
                }
            }
        };
        let size = match kind {
            PickupKind::Coin => t.coin_size,
            PickupKind::Boost => t.boost_size,
        };

        let id = self.next_entity_id();
        self.pickups.push(Pickup {
            id,
            kind,
            pos: Vec2::new(
                platform.center_x() - size / 2.0,
                platform.pos.y - t.pickup_lift - size,
            ),
            size,
        });
    }

    /// Remove a platform by index (order is not preserved)
    pub fn remove_platform(&mut self, index: usize) -> Platform {
        self.platforms.swap_remove(index)
    }

    /// Remove a pickup by index (order is not preserved)
    pub fn remove_pickup(&mut self, index: usize) -> Pickup {
        self.pickups.swap_remove(index)
    }

    /// Number of platforms spawned while in `level` (1..=3)
    pub fn spawned_in_level(&self, level: u8) -> u32 {
        match level {
            1..=3 => self.spawned_per_level[(level - 1) as usize],
            _ => 0,
        }
    }
}
