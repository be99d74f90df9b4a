//! Read-only snapshot for whatever draws the table

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{MatchPhase, MatchState, Outcome};
use crate::config::Rgb;
use crate::consts::*;

/// A filled circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
}

/// A chain polyline, anchor first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainView {
    pub points: Vec<Vec2>,
    pub color: Rgb,
    pub thickness: u32,
}

/// Axis-aligned goal mouth rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalRect {
    pub min: Vec2,
    pub max: Vec2,
    pub color: Rgb,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub table: Vec2,
    pub center_line_x: f32,
    pub goals: [GoalRect; 2],
    /// Strikers, indexed by player
    pub strikers: [BodyView; 2],
    /// Hammers, indexed by player
    pub hammers: [BodyView; 2],
    pub chains: [ChainView; 2],
    pub puck: BodyView,
    pub scores: [u32; 2],
    pub time_remaining: f64,
    pub phase: MatchPhase,
    pub outcome: Option<Outcome>,
}

impl RenderFrame {
    pub fn capture(state: &MatchState, now: f64) -> Self {
        let striker = |i: usize| {
            let s = &state.rigs[i].striker;
            BodyView {
                pos: s.pos,
                radius: s.radius,
                color: s.color,
            }
        };
        let hammer = |i: usize| {
            let h = &state.rigs[i].hammer;
            BodyView {
                pos: h.pos,
                radius: h.radius,
                color: h.color,
            }
        };
        let chain = |i: usize| {
            let c = &state.rigs[i].chain;
            ChainView {
                points: c.points(),
                color: c.params.color,
                thickness: c.params.thickness,
            }
        };

        Self {
            table: Vec2::new(TABLE_WIDTH, TABLE_HEIGHT),
            center_line_x: CENTER_LINE_X,
            goals: [
                GoalRect {
                    min: Vec2::new(0.0, GOAL_Y),
                    max: Vec2::new(GOAL_WIDTH, GOAL_Y + GOAL_HEIGHT),
                    color: Rgb::GOAL_GREEN,
                },
                GoalRect {
                    min: Vec2::new(TABLE_WIDTH - GOAL_WIDTH, GOAL_Y),
                    max: Vec2::new(TABLE_WIDTH, GOAL_Y + GOAL_HEIGHT),
                    color: Rgb::GOAL_GREEN,
                },
            ],
            strikers: [striker(0), striker(1)],
            hammers: [hammer(0), hammer(1)],
            chains: [chain(0), chain(1)],
            puck: BodyView {
                pos: state.puck.pos,
                radius: state.puck.radius,
                color: state.puck.color,
            },
            scores: state.scores,
            time_remaining: state.time_remaining(now),
            phase: state.phase,
            outcome: state.outcome,
        }
    }
}
