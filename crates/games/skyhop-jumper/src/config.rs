use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Visible window width in pixels.
pub const WINDOW_WIDTH: f32 = 400.0;
/// Visible window height in pixels.
pub const WINDOW_HEIGHT: f32 = 600.0;
/// Player diameter.
pub const PLAYER_SIZE: f32 = 30.0;
/// Downward acceleration per tick.
pub const GRAVITY: f32 = 0.6;
/// Base jump speed (upward, px/tick).
pub const JUMP_SPEED: f32 = 12.0;
/// Spring-boosted jump speed (upward, px/tick).
pub const SPRING_SPEED: f32 = 20.0;
/// Horizontal move speed (px/tick).
pub const MOVE_SPEED: f32 = 5.0;
/// Platform width.
pub const PLATFORM_WIDTH: f32 = 80.0;
/// Platform height.
pub const PLATFORM_HEIGHT: f32 = 15.0;
/// Number of platforms kept in the field.
pub const PLATFORM_COUNT: u32 = 10;

/// Environment variable overriding the config file path.
pub const CONFIG_ENV_VAR: &str = "SKYHOP_JUMPER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/jumper.toml";

/// Visible window dimensions, used for wrap-around, scroll midpoint, and despawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
        }
    }
}

impl WindowConfig {
    /// Y of the scroll line. The player never rises above it on screen.
    pub fn midpoint(&self) -> f32 {
        self.height / 2.0
    }
}

/// Player physics parameters. All speeds are per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub player_size: f32,
    pub gravity: f32,
    pub jump_speed: f32,
    pub spring_speed: f32,
    pub move_speed: f32,
    /// Distance from the spring's top centre within which the player's feet trigger it.
    pub spring_trigger_radius: f32,
    /// How far below the window the player may fall before the run ends.
    pub game_over_margin: f32,
    /// Downward drift of a broken platform per tick.
    pub broken_fall_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            player_size: PLAYER_SIZE,
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,
            spring_speed: SPRING_SPEED,
            move_speed: MOVE_SPEED,
            spring_trigger_radius: 20.0,
            game_over_margin: 100.0,
            broken_fall_speed: 5.0,
        }
    }
}

/// How the initial field is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// Random positions inside the window, rejecting near neighbours.
    RandomRejection,
    /// One platform every `gap` pixels above the anchor.
    FixedGap,
}

/// Which platforms may carry a spring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpringGate {
    /// Integer y is odd and the platform does not break.
    OddYUnbreakable,
    /// Any platform that does not break.
    Unbreakable,
    Always,
    Never,
}

/// Relative weights of each platform kind. Need not sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindWeights {
    pub hazard: f32,
    pub breakable: f32,
    pub moving: f32,
    pub solid: f32,
}

impl KindWeights {
    /// 10% hazard, 15% breakable, 15% moving, 60% solid.
    pub fn classic() -> Self {
        Self {
            hazard: 0.10,
            breakable: 0.15,
            moving: 0.15,
            solid: 0.60,
        }
    }

    /// 35% breakable, 15% moving, 50% solid, no hazards.
    pub fn green_heavy() -> Self {
        Self {
            hazard: 0.0,
            breakable: 0.35,
            moving: 0.15,
            solid: 0.50,
        }
    }

    pub fn total(&self) -> f32 {
        self.hazard + self.breakable + self.moving + self.solid
    }

    fn is_valid(&self) -> bool {
        let all = [self.hazard, self.breakable, self.moving, self.solid];
        all.iter().all(|w| w.is_finite() && *w >= 0.0) && self.total() > 0.0
    }
}

impl Default for KindWeights {
    fn default() -> Self {
        Self::classic()
    }
}

/// Spring spawning parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Probability that an admitted platform gets a spring.
    pub chance: f32,
    pub gate: SpringGate,
    pub width: f32,
    pub height: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            chance: 0.4,
            gate: SpringGate::OddYUnbreakable,
            width: 20.0,
            height: 10.0,
        }
    }
}

/// Platform field generation and lifecycle parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub platform_count: u32,
    pub platform_width: f32,
    pub platform_height: f32,
    pub placement: PlacementPolicy,
    /// Vertical spacing for fixed-gap placement and for replacements.
    pub gap: f32,
    pub min_separation_x: f32,
    pub min_separation_y: f32,
    /// Rejected samples allowed per platform before overlap is accepted.
    pub max_placement_attempts: u32,
    /// Keep platform centres this far from the window edges.
    pub edge_margin: f32,
    /// Distance of the starting platform above the window bottom.
    pub anchor_offset: f32,
    /// Platforms further than this below the window are replaced.
    pub despawn_margin: f32,
    pub kind_weights: KindWeights,
    pub moving_speed_min: f32,
    pub moving_speed_max: f32,
    pub spring: SpringConfig,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            platform_count: PLATFORM_COUNT,
            platform_width: PLATFORM_WIDTH,
            platform_height: PLATFORM_HEIGHT,
            placement: PlacementPolicy::RandomRejection,
            gap: 60.0,
            min_separation_x: 80.0,
            min_separation_y: 50.0,
            max_placement_attempts: 100,
            edge_margin: 50.0,
            anchor_offset: 50.0,
            despawn_margin: 40.0,
            kind_weights: KindWeights::classic(),
            moving_speed_min: 1.0,
            moving_speed_max: 3.0,
            spring: SpringConfig::default(),
        }
    }
}

/// What happens to the player's vertical speed on landing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingPolicy {
    /// Stop on solid platforms; `vy` is zeroed on every landing.
    Rest,
    /// Relaunch with the base jump speed on every landing.
    Launch,
}

/// Session-level switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub landing: LandingPolicy,
    /// Hold gravity and scrolling until the first jump press.
    pub jump_gate: bool,
    /// Fixed RNG seed. A random one is drawn (and logged) when unset.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            landing: LandingPolicy::Rest,
            jump_gate: true,
            seed: None,
        }
    }
}

/// Top-level jumper configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JumperConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub field: FieldConfig,
    pub session: SessionConfig,
}

impl JumperConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    JumperConfig::default()
                },
            },
            Err(_) => JumperConfig::default(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reject values no playable field follows from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = &self.field;
        if field.platform_count == 0 {
            return Err(ConfigError::ZeroPlatformCount);
        }

        let positive = [
            ("window.width", self.window.width),
            ("window.height", self.window.height),
            ("physics.player_size", self.physics.player_size),
            ("physics.gravity", self.physics.gravity),
            ("physics.jump_speed", self.physics.jump_speed),
            ("physics.spring_speed", self.physics.spring_speed),
            ("physics.move_speed", self.physics.move_speed),
            ("physics.spring_trigger_radius", self.physics.spring_trigger_radius),
            ("physics.broken_fall_speed", self.physics.broken_fall_speed),
            ("field.platform_width", field.platform_width),
            ("field.platform_height", field.platform_height),
            ("field.gap", field.gap),
            ("field.spring.width", field.spring.width),
            ("field.spring.height", field.spring.height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field: name, value });
            }
        }

        let non_negative = [
            ("physics.game_over_margin", self.physics.game_over_margin),
            ("field.min_separation_x", field.min_separation_x),
            ("field.min_separation_y", field.min_separation_y),
            ("field.edge_margin", field.edge_margin),
            ("field.anchor_offset", field.anchor_offset),
            ("field.despawn_margin", field.despawn_margin),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NonPositive { field: name, value });
            }
        }

        // Sample ranges must be non-empty.
        if field.edge_margin * 2.0 > self.window.width {
            return Err(ConfigError::NonPositive {
                field: "window.width - 2 * field.edge_margin",
                value: self.window.width - field.edge_margin * 2.0,
            });
        }
        if field.edge_margin * 2.0 > self.window.height {
            return Err(ConfigError::NonPositive {
                field: "window.height - 2 * field.edge_margin",
                value: self.window.height - field.edge_margin * 2.0,
            });
        }

        if !field.kind_weights.is_valid() {
            return Err(ConfigError::InvalidKindWeights);
        }

        let (min, max) = (field.moving_speed_min, field.moving_speed_max);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::InvalidSpeedRange { min, max });
        }

        let chance = field.spring.chance;
        if !(0.0..=1.0).contains(&chance) {
            return Err(ConfigError::InvalidProbability {
                field: "field.spring.chance",
                value: chance,
            });
        }

        Ok(())
    }
}
