//! Chain Hockey - two strikers, two chained hammers, one puck
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (chain physics, collisions, match state)
//! - `config`: Per-player and global tunables
//! - `persistence`: Storage backends for the configuration bundle
//! - `platform`: Native/browser differences (logging, default storage)
//! - `net`: Wire protocol, room relay and threaded client

pub mod config;
pub mod net;
pub mod persistence;
pub mod platform;
pub mod sim;

pub use config::{ConfigManager, GameConfig, GlobalConfig, PlayerConfig, Rgb};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target simulation rate; velocities are expressed in units per tick
    pub const TICK_RATE: u32 = 60;

    /// Table dimensions
    pub const TABLE_WIDTH: f32 = 1200.0;
    pub const TABLE_HEIGHT: f32 = 700.0;
    pub const CENTER_LINE_X: f32 = TABLE_WIDTH / 2.0;

    /// Goal mouths sit in the left and right walls, vertically centered
    pub const GOAL_WIDTH: f32 = 20.0;
    pub const GOAL_HEIGHT: f32 = 200.0;
    pub const GOAL_Y: f32 = (TABLE_HEIGHT - GOAL_HEIGHT) / 2.0;

    /// Spawn points: player one defends the left goal, player two the right
    pub const PLAYER1_SPAWN_X: f32 = TABLE_WIDTH * 0.25;
    pub const PLAYER2_SPAWN_X: f32 = TABLE_WIDTH * 0.75;
    pub const PLAYER_SPAWN_Y: f32 = TABLE_HEIGHT / 2.0;

    /// Striker defaults
    pub const STRIKER_RADIUS: f32 = 20.0;
    pub const STRIKER_MASS: f32 = 5.0;
    /// Keyboard step per tick
    pub const STRIKER_SPEED: f32 = 5.0;

    /// Hammer defaults
    pub const HAMMER_RADIUS: f32 = 35.0;
    pub const HAMMER_MASS: f32 = 10.0;

    /// Puck defaults
    pub const PUCK_RADIUS: f32 = 15.0;
    pub const PUCK_MASS: f32 = 1.0;
    pub const PUCK_FRICTION: f32 = 0.985;
    pub const PUCK_WALL_BOUNCE: f32 = 0.85;

    /// Chain defaults
    pub const CHAIN_SEGMENTS: usize = 10;
    pub const SEGMENT_LENGTH: f32 = 15.0;
    pub const CHAIN_THICKNESS: u32 = 3;
    pub const CHAIN_DAMPING: f32 = 0.80;
    pub const CHAIN_SEGMENT_RADIUS: f32 = 2.0;
    pub const GRAVITY: f32 = 0.0;
    pub const CONSTRAINT_ITERATIONS: u32 = 15;

    /// Pair restitution: hammers amplify, strikers damp
    pub const HAMMER_RESTITUTION: f32 = 1.2;
    pub const STRIKER_RESTITUTION: f32 = 0.4;

    /// Floor applied to every distance used as a divisor
    pub const MIN_DISTANCE: f32 = 0.01;

    /// Puck freeze after a goal (1 second at 60 Hz)
    pub const GOAL_COOLDOWN_TICKS: u32 = 60;

    /// Match rules
    pub const GAME_DURATION_SECONDS: u32 = 300;
    pub const MAX_GOALS: u32 = 10;

    /// Host snapshot cadence
    pub const SNAPSHOT_INTERVAL_SECS: f64 = 0.1;
}

/// Unit vector from `from` toward `to`, with the distance floored at
/// `consts::MIN_DISTANCE`. Returns the normal and the floored distance.
#[inline]
pub fn floored_normal(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    let distance = delta.length().max(consts::MIN_DISTANCE);
    (delta / distance, distance)
}

/// Clamp a circle center into `[min_x + r, max_x - r] x [r, TABLE_HEIGHT - r]`.
///
/// Uses max-then-min rather than `f32::clamp` so an oversized radius from an
/// unvalidated config pins to the upper bound instead of panicking.
#[inline]
pub fn clamp_to_half(pos: Vec2, radius: f32, half: sim::TableHalf) -> Vec2 {
    Vec2::new(
        pos.x.max(half.min_x + radius).min(half.max_x - radius),
        pos.y.max(radius).min(consts::TABLE_HEIGHT - radius),
    )
}
