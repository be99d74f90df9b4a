//! Striker, hammer and puck controllers
//!
//! Strikers and hammers are kinematic: their velocity is whatever their
//! position did this tick. The puck is the only body carrying integrated
//! velocity from tick to tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::TableHalf;
use super::collision::Circle;
use crate::clamp_to_half;
use crate::config::{PlayerConfig, Rgb};
use crate::consts::*;

/// Directional intent ("key-style" control)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionFlags {
    /// Unnormalized step direction; opposite keys cancel
    pub fn axis(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }
}

/// Control for one striker for one tick, from a local device or the network
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlInput {
    /// Follow an absolute table position (mouse/touch)
    Target(Vec2),
    /// Step by the striker's speed along the held directions
    Directional(DirectionFlags),
}

/// Player-driven striker confined to one half of the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Striker {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    /// Position delta over the last tick
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    /// Per-tick step for directional control
    pub speed: f32,
    pub half: TableHalf,
    pub color: Rgb,
}

impl Striker {
    pub fn new(spawn: Vec2, config: &PlayerConfig, half: TableHalf) -> Self {
        let pos = clamp_to_half(spawn, config.striker_radius, half);
        Self {
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            radius: config.striker_radius,
            mass: config.striker_mass,
            speed: config.striker_speed,
            half,
            color: config.striker_color,
        }
    }

    /// Apply this tick's control. `None` holds position (zero velocity).
    pub fn apply_control(&mut self, input: Option<&ControlInput>) {
        self.prev_pos = self.pos;

        let wanted = match input {
            Some(ControlInput::Target(target)) => *target,
            Some(ControlInput::Directional(flags)) => self.pos + flags.axis() * self.speed,
            None => self.pos,
        };

        // Inputs are never trusted; NaN targets leave the striker in place
        if wanted.is_finite() {
            self.pos = clamp_to_half(wanted, self.radius, self.half);
        }
        self.vel = self.pos - self.prev_pos;
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.vel, self.radius, self.mass)
    }
}

/// Heavy head at the end of the chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hammer {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub half: TableHalf,
    pub color: Rgb,
}

impl Hammer {
    pub fn new(tip: Vec2, config: &PlayerConfig, half: TableHalf) -> Self {
        let pos = clamp_to_half(tip, config.hammer_radius, half);
        Self {
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            radius: config.hammer_radius,
            mass: config.hammer_mass,
            half,
            color: config.hammer_color,
        }
    }

    /// Follow the chain tip, clamped to the owner's half
    pub fn update_position(&mut self, tip: Vec2) {
        self.prev_pos = self.pos;
        self.pos = clamp_to_half(tip, self.radius, self.half);
        self.vel = self.pos - self.prev_pos;
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.vel, self.radius, self.mass)
    }
}

/// Which goal mouth the puck entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalSide {
    Left,
    Right,
}

/// The puck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puck {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub friction: f32,
    pub wall_bounce: f32,
    pub color: Rgb,
}

impl Puck {
    pub fn new(friction: f32, wall_bounce: f32) -> Self {
        Self {
            pos: Self::center(),
            vel: Vec2::ZERO,
            radius: PUCK_RADIUS,
            mass: PUCK_MASS,
            friction,
            wall_bounce,
            color: Rgb::YELLOW,
        }
    }

    pub fn center() -> Vec2 {
        Vec2::new(TABLE_WIDTH / 2.0, TABLE_HEIGHT / 2.0)
    }

    /// Back to center, at rest
    pub fn reset(&mut self) {
        self.pos = Self::center();
        self.vel = Vec2::ZERO;
    }

    #[inline]
    fn in_goal_mouth(y: f32) -> bool {
        GOAL_Y < y && y < GOAL_Y + GOAL_HEIGHT
    }

    /// Advance one tick. Returns the goal entered, if any; a goal skips the
    /// wall pass since the mouth is a gap in the wall.
    pub fn update(&mut self) -> Option<GoalSide> {
        self.vel *= self.friction;
        self.pos += self.vel;

        let in_mouth = Self::in_goal_mouth(self.pos.y);
        if in_mouth && self.pos.x - self.radius < GOAL_WIDTH {
            return Some(GoalSide::Left);
        }
        if in_mouth && self.pos.x + self.radius > TABLE_WIDTH - GOAL_WIDTH {
            return Some(GoalSide::Right);
        }

        if self.pos.x - self.radius < 0.0 && !in_mouth {
            self.pos.x = self.radius;
            self.vel.x = self.vel.x.abs() * self.wall_bounce;
        }
        if self.pos.x + self.radius > TABLE_WIDTH && !in_mouth {
            self.pos.x = TABLE_WIDTH - self.radius;
            self.vel.x = -self.vel.x.abs() * self.wall_bounce;
        }

        if self.pos.y - self.radius < 0.0 {
            self.pos.y = self.radius;
            self.vel.y = self.vel.y.abs() * self.wall_bounce;
        } else if self.pos.y + self.radius > TABLE_HEIGHT {
            self.pos.y = TABLE_HEIGHT - self.radius;
            self.vel.y = -self.vel.y.abs() * self.wall_bounce;
        }

        None
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.vel, self.radius, self.mass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn left_half() -> TableHalf {
        TableHalf::for_player(crate::sim::Player::One)
    }

    /// A puck that sits still (friction 1) so one update only moves it by `vel`
    fn still_puck(x: f32, y: f32, vel: Vec2) -> Puck {
        let mut puck = Puck::new(1.0, PUCK_WALL_BOUNCE);
        puck.pos = Vec2::new(x, y);
        puck.vel = vel;
        puck
    }

    #[test]
    fn test_striker_target_is_clamped_to_half() {
        let config = GameConfig::default();
        let mut striker = Striker::new(Vec2::new(300.0, 350.0), &config.player1, left_half());

        striker.apply_control(Some(&ControlInput::Target(Vec2::new(1000.0, -50.0))));
        assert_eq!(striker.pos, Vec2::new(CENTER_LINE_X - 20.0, 20.0));
        assert_eq!(striker.vel, striker.pos - Vec2::new(300.0, 350.0));
    }

    #[test]
    fn test_striker_directional_steps_by_speed() {
        let config = GameConfig::default();
        let mut striker = Striker::new(Vec2::new(300.0, 350.0), &config.player1, left_half());

        let flags = DirectionFlags {
            up: true,
            right: true,
            ..Default::default()
        };
        striker.apply_control(Some(&ControlInput::Directional(flags)));
        assert_eq!(striker.pos, Vec2::new(305.0, 345.0));

        striker.apply_control(None);
        assert_eq!(striker.pos, Vec2::new(305.0, 345.0));
        assert_eq!(striker.vel, Vec2::ZERO);
    }

    #[test]
    fn test_striker_ignores_non_finite_target() {
        let config = GameConfig::default();
        let mut striker = Striker::new(Vec2::new(300.0, 350.0), &config.player1, left_half());
        striker.apply_control(Some(&ControlInput::Target(Vec2::new(f32::NAN, 10.0))));
        assert_eq!(striker.pos, Vec2::new(300.0, 350.0));
    }

    #[test]
    fn test_hammer_velocity_from_tip_delta() {
        let config = GameConfig::default();
        let mut hammer = Hammer::new(Vec2::new(200.0, 300.0), &config.player1, left_half());
        hammer.update_position(Vec2::new(210.0, 296.0));
        assert_eq!(hammer.vel, Vec2::new(10.0, -4.0));

        // Past the center line the hammer stops at its own radius
        hammer.update_position(Vec2::new(650.0, 296.0));
        assert_eq!(hammer.pos.x, CENTER_LINE_X - 35.0);
    }

    #[test]
    fn test_friction_decays_before_move() {
        let mut puck = Puck::new(0.5, PUCK_WALL_BOUNCE);
        puck.vel = Vec2::new(10.0, 0.0);
        puck.update();
        assert_eq!(puck.vel, Vec2::new(5.0, 0.0));
        assert_eq!(puck.pos, Puck::center() + Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_goal_at_mouth_edge() {
        // Leading edge one unit inside the goal line, centered in the mouth
        let y = GOAL_Y + GOAL_HEIGHT / 2.0;
        let mut puck = still_puck(GOAL_WIDTH - 1.0 + PUCK_RADIUS, y, Vec2::ZERO);
        assert_eq!(puck.update(), Some(GoalSide::Left));

        let mut puck = still_puck(TABLE_WIDTH - GOAL_WIDTH + 1.0 - PUCK_RADIUS, y, Vec2::ZERO);
        assert_eq!(puck.update(), Some(GoalSide::Right));
    }

    #[test]
    fn test_no_goal_just_outside_mouth() {
        let x = GOAL_WIDTH - 1.0 + PUCK_RADIUS;
        let mut above = still_puck(x, GOAL_Y - 1.0, Vec2::ZERO);
        assert_eq!(above.update(), None);
        let mut below = still_puck(x, GOAL_Y + GOAL_HEIGHT + 1.0, Vec2::ZERO);
        assert_eq!(below.update(), None);
    }

    #[test]
    fn test_wall_bounce_outside_mouth() {
        let mut puck = still_puck(PUCK_RADIUS + 2.0, GOAL_Y - 1.0, Vec2::new(-10.0, 0.0));
        assert_eq!(puck.update(), None);
        assert_eq!(puck.pos.x, PUCK_RADIUS);
        assert!((puck.vel.x - 10.0 * PUCK_WALL_BOUNCE).abs() < 1e-5);
    }

    #[test]
    fn test_top_and_bottom_bounce_point_inward() {
        let mut puck = still_puck(600.0, PUCK_RADIUS + 1.0, Vec2::new(0.0, -6.0));
        puck.update();
        assert_eq!(puck.pos.y, PUCK_RADIUS);
        assert!(puck.vel.y > 0.0);

        let mut puck = still_puck(600.0, TABLE_HEIGHT - PUCK_RADIUS - 1.0, Vec2::new(0.0, 6.0));
        puck.update();
        assert_eq!(puck.pos.y, TABLE_HEIGHT - PUCK_RADIUS);
        assert!(puck.vel.y < 0.0);
        assert!(puck.vel.y.abs() <= 6.0);
    }

    #[test]
    fn test_reset_returns_to_center_at_rest() {
        let mut puck = still_puck(100.0, 100.0, Vec2::new(3.0, 4.0));
        puck.reset();
        assert_eq!(puck.pos, Puck::center());
        assert_eq!(puck.vel, Vec2::ZERO);
    }
}
