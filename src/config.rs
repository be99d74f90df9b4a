//! Game configuration and its persistence
//!
//! One bundle per match: a [`PlayerConfig`] per seat plus [`GlobalConfig`].
//! Stored as JSON in the layout `{"player1": .., "player2": .., "global": ..}`;
//! missing fields fall back to defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{ConfigStore, StoreError};

/// RGB color, serialized as a `[r, g, b]` array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(220, 50, 50);
    pub const BLUE: Rgb = Rgb(50, 120, 220);
    pub const CYAN: Rgb = Rgb(50, 200, 200);
    pub const ORANGE: Rgb = Rgb(255, 140, 50);
    pub const YELLOW: Rgb = Rgb(255, 220, 80);
    pub const PURPLE: Rgb = Rgb(200, 150, 255);
    pub const GOAL_GREEN: Rgb = Rgb(50, 255, 100);
}

/// One player's striker, chain and hammer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    // === Striker ===
    pub striker_radius: f32,
    pub striker_color: Rgb,
    pub striker_mass: f32,
    /// Per-tick step under directional control
    pub striker_speed: f32,

    // === Chain ===
    pub chain_segments: usize,
    pub segment_length: f32,
    pub chain_color: Rgb,
    pub chain_thickness: u32,
    pub chain_damping: f32,

    // === Hammer ===
    pub hammer_radius: f32,
    pub hammer_color: Rgb,
    pub hammer_mass: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::player_one()
    }
}

impl PlayerConfig {
    pub fn player_one() -> Self {
        Self {
            striker_radius: STRIKER_RADIUS,
            striker_color: Rgb::RED,
            striker_mass: STRIKER_MASS,
            striker_speed: STRIKER_SPEED,

            chain_segments: CHAIN_SEGMENTS,
            segment_length: SEGMENT_LENGTH,
            chain_color: Rgb::CYAN,
            chain_thickness: CHAIN_THICKNESS,
            chain_damping: CHAIN_DAMPING,

            hammer_radius: HAMMER_RADIUS,
            hammer_color: Rgb::ORANGE,
            hammer_mass: HAMMER_MASS,
        }
    }

    pub fn player_two() -> Self {
        Self {
            striker_color: Rgb::BLUE,
            chain_color: Rgb::PURPLE,
            ..Self::player_one()
        }
    }
}

/// Table-wide physics and match rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub gravity: f32,
    pub constraint_iterations: u32,
    pub puck_friction: f32,
    pub puck_wall_bounce: f32,
    pub game_duration_seconds: u32,
    pub max_goals: u32,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            constraint_iterations: CONSTRAINT_ITERATIONS,
            puck_friction: PUCK_FRICTION,
            puck_wall_bounce: PUCK_WALL_BOUNCE,
            game_duration_seconds: GAME_DURATION_SECONDS,
            max_goals: MAX_GOALS,
        }
    }
}

/// Complete configuration bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "PlayerConfig::player_one")]
    pub player1: PlayerConfig,
    #[serde(default = "PlayerConfig::player_two")]
    pub player2: PlayerConfig,
    #[serde(default)]
    pub global: GlobalConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player1: PlayerConfig::player_one(),
            player2: PlayerConfig::player_two(),
            global: GlobalConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Store(StoreError),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Store(e) => write!(f, "config storage failed: {e}"),
            ConfigError::Json(e) => write!(f, "config is not valid JSON: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Store(e) => Some(e),
            ConfigError::Json(e) => Some(e),
        }
    }
}

impl From<StoreError> for ConfigError {
    fn from(e: StoreError) -> Self {
        ConfigError::Store(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Owns the active configuration and the backend it is persisted to
pub struct ConfigManager {
    store: Box<dyn ConfigStore>,
    config: GameConfig,
}

impl ConfigManager {
    /// Starts from defaults; call [`ConfigManager::load`] to read the store
    pub fn new(store: Box<dyn ConfigStore>) -> Self {
        Self {
            store,
            config: GameConfig::default(),
        }
    }

    /// Read the stored bundle. Returns `true` if one was found and parsed;
    /// anything else leaves the defaults in place.
    pub fn load(&mut self) -> bool {
        match self.try_load() {
            Ok(Some(config)) => {
                self.config = config;
                log::info!("Loaded config");
                true
            }
            Ok(None) => {
                log::info!("No stored config, using defaults");
                self.config = GameConfig::default();
                false
            }
            Err(e) => {
                log::warn!("Error loading config: {e}. Using defaults.");
                self.config = GameConfig::default();
                false
            }
        }
    }

    fn try_load(&self) -> Result<Option<GameConfig>, ConfigError> {
        match self.store.load()? {
            Some(json) => Ok(Some(GameConfig::from_json(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let json = self.config.to_json()?;
        self.store.save(&json)?;
        log::info!("Config saved");
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config;
    }

    pub fn reset_to_defaults(&mut self) {
        self.config = GameConfig::default();
    }
}
