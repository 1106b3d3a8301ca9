//! Tunable game settings
//!
//! Everything the simulation treats as a constant lives here so a run can be
//! rebalanced from a JSON file without recompiling. All sections use
//! `#[serde(default)]`, a partial file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Reasons a settings block cannot drive a simulation
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("viewport must have positive size, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("{what} must have positive size, got {width}x{height}")]
    InvalidSize {
        what: &'static str,
        width: f32,
        height: f32,
    },
    #[error("platform width {platform} does not fit in viewport width {viewport}")]
    PlatformTooWide { platform: f32, viewport: f32 },
    #[error("gap range must satisfy 0 < min_gap <= max_gap, got [{min}, {max}]")]
    InvalidGapRange { min: f32, max: f32 },
    #[error("platform speed range must satisfy 0 <= min <= max, got [{min}, {max}]")]
    InvalidSpeedRange { min: f32, max: f32 },
    #[error("gap growth must be finite and non-negative, got {0}")]
    InvalidGapGrowth(f32),
    #[error("top margin must lie in [0, {height}), got {margin}")]
    InvalidTopMargin { margin: f32, height: f32 },
    #[error("largest gap {gap} exceeds the maximum jump height {reach}")]
    UnreachableGap { gap: f32, reach: f32 },
    #[error("{what} must be upward (negative), got {value}")]
    InvalidImpulse { what: &'static str, value: f32 },
    #[error("gravity must be positive, got {0}")]
    InvalidGravity(f32),
    #[error("scroll fraction must lie in (0, 1), got {0}")]
    InvalidScrollFraction(f32),
    #[error("probability {what} must lie in [0, 1], got {value}")]
    InvalidProbability { what: &'static str, value: f32 },
    #[error("could not read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Visible play area in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Fraction of the viewport height above which the player never rises
    pub scroll_fraction: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1080.0,
            height: 1920.0,
            scroll_fraction: 1.0 / 3.0,
        }
    }
}

impl Viewport {
    /// Screen-space y of the scroll threshold
    #[inline]
    pub fn scroll_threshold(&self) -> f32 {
        self.height * self.scroll_fraction
    }
}

/// Player body and motion constants (per-tick units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    pub gravity: f32,
    /// Vertical velocity applied on every solid landing
    pub jump_impulse: f32,
    /// Vertical velocity applied by a boost pickup
    pub boost_impulse: f32,
    pub tilt_sensitivity: f32,
    pub player_size: f32,
    pub player_mass: f32,
    pub player_restitution: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: consts::GRAVITY,
            jump_impulse: consts::JUMP_IMPULSE,
            boost_impulse: consts::BOOST_IMPULSE,
            tilt_sensitivity: consts::TILT_SENSITIVITY,
            player_size: consts::PLAYER_SIZE,
            player_mass: 1.0,
            player_restitution: 0.0,
        }
    }
}

impl Physics {
    /// Highest rise reachable from a single jump impulse
    pub fn max_jump_height(&self) -> f32 {
        self.jump_impulse * self.jump_impulse / (2.0 * self.gravity)
    }
}

/// World generator balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Generation {
    pub platform_width: f32,
    pub platform_height: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    /// Extra gap fraction reached at the top difficulty (multiplier = 1 + growth)
    pub gap_growth: f32,
    /// Keep spawning while the topmost platform sits below this y
    pub top_margin: f32,
    pub min_platform_speed: f32,
    pub max_platform_speed: f32,
    pub coin_chance: f32,
    pub boost_chance: f32,
    pub coin_size: f32,
    pub boost_size: f32,
    /// Distance between a pickup's bottom edge and its platform's top
    pub pickup_lift: f32,
}

impl Default for Generation {
    fn default() -> Self {
        Self {
            platform_width: 200.0,
            platform_height: 20.0,
            min_gap: 120.0,
            max_gap: 240.0,
            gap_growth: 0.5,
            top_margin: 150.0,
            min_platform_speed: 2.0,
            max_platform_speed: 5.0,
            coin_chance: 0.10,
            boost_chance: 0.03,
            coin_size: 50.0,
            boost_size: 60.0,
            pickup_lift: 10.0,
        }
    }
}

/// Complete settings for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub viewport: Viewport,
    pub physics: Physics,
    pub generation: Generation,
}

impl Settings {
    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Check every precondition the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        let v = &self.viewport;
        if !(v.width > 0.0 && v.height > 0.0) {
            return Err(SettingsError::InvalidViewport {
                width: v.width,
                height: v.height,
            });
        }
        if !(v.scroll_fraction > 0.0 && v.scroll_fraction < 1.0) {
            return Err(SettingsError::InvalidScrollFraction(v.scroll_fraction));
        }

        let p = &self.physics;
        if p.player_size <= 0.0 {
            return Err(SettingsError::InvalidSize {
                what: "player",
                width: p.player_size,
                height: p.player_size,
            });
        }
        if p.gravity <= 0.0 {
            return Err(SettingsError::InvalidGravity(p.gravity));
        }
        if p.jump_impulse >= 0.0 {
            return Err(SettingsError::InvalidImpulse {
                what: "jump impulse",
                value: p.jump_impulse,
            });
        }
        if p.boost_impulse >= 0.0 {
            return Err(SettingsError::InvalidImpulse {
                what: "boost impulse",
                value: p.boost_impulse,
            });
        }

        let g = &self.generation;
        if !(g.platform_width > 0.0 && g.platform_height > 0.0) {
            return Err(SettingsError::InvalidSize {
                what: "platform",
                width: g.platform_width,
                height: g.platform_height,
            });
        }
        if g.platform_width > v.width {
            return Err(SettingsError::PlatformTooWide {
                platform: g.platform_width,
                viewport: v.width,
            });
        }
        if !(g.coin_size > 0.0 && g.boost_size > 0.0) {
            return Err(SettingsError::InvalidSize {
                what: "pickup",
                width: g.coin_size.min(g.boost_size),
                height: g.coin_size.min(g.boost_size),
            });
        }
        if !(g.min_gap > 0.0 && g.min_gap <= g.max_gap) {
            return Err(SettingsError::InvalidGapRange {
                min: g.min_gap,
                max: g.max_gap,
            });
        }
        if !(g.min_platform_speed >= 0.0 && g.min_platform_speed <= g.max_platform_speed) {
            return Err(SettingsError::InvalidSpeedRange {
                min: g.min_platform_speed,
                max: g.max_platform_speed,
            });
        }
        if !(g.gap_growth.is_finite() && g.gap_growth >= 0.0) {
            return Err(SettingsError::InvalidGapGrowth(g.gap_growth));
        }
        if !(g.top_margin >= 0.0 && g.top_margin < v.height) {
            return Err(SettingsError::InvalidTopMargin {
                margin: g.top_margin,
                height: v.height,
            });
        }
        let worst_gap = g.max_gap * (1.0 + g.gap_growth);
        let reach = p.max_jump_height();
        if worst_gap > reach {
            return Err(SettingsError::UnreachableGap {
                gap: worst_gap,
                reach,
            });
        }
        for (what, value) in [
            ("coin_chance", g.coin_chance),
            ("boost_chance", g.boost_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::InvalidProbability { what, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn test_default_gaps_are_reachable() {
        let s = Settings::default();
        let worst = s.generation.max_gap * (1.0 + s.generation.gap_growth);
        assert!(worst < s.physics.max_jump_height());
        // 60^2 / (2 * 2)
        assert!((s.physics.max_jump_height() - 900.0).abs() < 0.001);
    }

    #[test]
    fn test_rejects_degenerate_viewport() {
        let mut s = Settings::default();
        s.viewport.height = 0.0;
        assert!(matches!(
            s.validate(),
            Err(SettingsError::InvalidViewport { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_size_player() {
        let mut s = Settings::default();
        s.physics.player_size = 0.0;
        assert!(matches!(s.validate(), Err(SettingsError::InvalidSize { .. })));
    }

    #[test]
    fn test_rejects_unreachable_gap() {
        let mut s = Settings::default();
        s.generation.max_gap = 800.0;
        assert!(matches!(
            s.validate(),
            Err(SettingsError::UnreachableGap { .. })
        ));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "viewport": { "width": 720.0 }, "physics": { "gravity": 2.5 } }"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.viewport.width, 720.0);
        assert_eq!(s.viewport.height, Viewport::default().height);
        assert_eq!(s.physics.gravity, 2.5);
        assert_eq!(s.generation, Generation::default());
        s.validate().unwrap();
    }

    #[test]
    fn test_probability_out_of_range() {
        let mut s = Settings::default();
        s.generation.boost_chance = 1.5;
        assert!(matches!(
            s.validate(),
            Err(SettingsError::InvalidProbability { what: "boost_chance", .. })
        ));
    }

    #[test]
    fn test_rejects_shrinking_gaps() {
        let mut s = Settings::default();
        s.generation.gap_growth = -1.0;
        assert!(matches!(
            s.validate(),
            Err(SettingsError::InvalidGapGrowth(_))
        ));
        s.generation.gap_growth = f32::NAN;
        assert!(matches!(
            s.validate(),
            Err(SettingsError::InvalidGapGrowth(_))
        ));
        s.generation.gap_growth = 0.0;
        s.validate().unwrap();
    }

    #[test]
    fn test_rejects_top_margin_outside_viewport() {
        let mut s = Settings::default();
        for margin in [-1.0, s.viewport.height, f32::INFINITY, f32::NAN] {
            s.generation.top_margin = margin;
            assert!(matches!(
                s.validate(),
                Err(SettingsError::InvalidTopMargin { .. })
            ));
        }
        s.generation.top_margin = 0.0;
        s.validate().unwrap();
    }
}
