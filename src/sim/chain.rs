//! Verlet chain tethering a striker to its hammer
//!
//! The chain is a row of point masses. Segment 0 is hard-pinned to the
//! striker; the others integrate from their position history, get clamped
//! into the table (and the owner's half), then relax toward rest length while
//! being kept out of the striker disc. The last segment is the hammer anchor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::TableHalf;
use crate::config::{GlobalConfig, PlayerConfig, Rgb};
use crate::consts::{CHAIN_SEGMENT_RADIUS, MIN_DISTANCE, TABLE_HEIGHT, TABLE_WIDTH};
use crate::floored_normal;

/// A single point of the chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainSegment {
    pub pos: Vec2,
    /// Position one tick ago; velocity is implied by `pos - prev_pos`
    pub prev_pos: Vec2,
    pub pinned: bool,
}

impl ChainSegment {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            prev_pos: pos,
            pinned: false,
        }
    }

    /// Implied per-tick velocity
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.pos - self.prev_pos
    }

    fn integrate(&mut self, damping: f32, gravity: f32) {
        let vel = (self.pos - self.prev_pos) * damping;
        self.prev_pos = self.pos;
        self.pos += vel;
        self.pos.y += gravity;
    }
}

/// Tunables fixed for the lifetime of one chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainParams {
    pub segments: usize,
    pub rest_length: f32,
    pub damping: f32,
    pub gravity: f32,
    pub iterations: u32,
    /// Radius each segment keeps clear of the striker edge
    pub collision_radius: f32,
    pub thickness: u32,
    pub color: Rgb,
}

impl ChainParams {
    pub fn from_config(player: &PlayerConfig, global: &GlobalConfig) -> Self {
        Self {
            segments: player.chain_segments,
            rest_length: player.segment_length,
            damping: player.chain_damping,
            gravity: global.gravity,
            iterations: global.constraint_iterations,
            collision_radius: CHAIN_SEGMENT_RADIUS,
            thickness: player.chain_thickness,
            color: player.chain_color,
        }
    }
}

/// Particle chain with fixed-length links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    pub segments: Vec<ChainSegment>,
    pub params: ChainParams,
    /// Horizontal confinement in two-player mode
    pub bounds: Option<TableHalf>,
}

impl Chain {
    /// Lay `params.segments + 1` points out horizontally from `start`
    pub fn new(start: Vec2, params: ChainParams, bounds: Option<TableHalf>) -> Self {
        let segments = (0..=params.segments)
            .map(|i| ChainSegment::new(start + Vec2::X * (i as f32 * params.rest_length)))
            .collect();

        Self {
            segments,
            params,
            bounds,
        }
    }

    /// Advance one tick with the striker at `striker_pos`
    pub fn update(&mut self, striker_pos: Vec2, striker_radius: f32) {
        let Some((anchor, rest)) = self.segments.split_first_mut() else {
            return;
        };

        anchor.pos = striker_pos;
        anchor.prev_pos = striker_pos;
        anchor.pinned = true;

        let (min_x, max_x) = match self.bounds {
            Some(half) => (half.min_x.max(0.0), half.max_x.min(TABLE_WIDTH)),
            None => (0.0, TABLE_WIDTH),
        };

        for segment in rest.iter_mut() {
            segment.integrate(self.params.damping, self.params.gravity);
            segment.pos.x = segment.pos.x.max(min_x).min(max_x);
            segment.pos.y = segment.pos.y.clamp(0.0, TABLE_HEIGHT);
        }

        // Exclusion runs inside every pass, after relaxation, so a fast
        // striker cannot drag links through its own disc
        for _ in 0..self.params.iterations {
            self.relax_links();
            self.push_out_of_striker(striker_pos, striker_radius);
        }
    }

    /// One Gauss-Seidel sweep over every adjacent pair
    fn relax_links(&mut self) {
        let rest_length = self.params.rest_length;

        for i in 0..self.segments.len().saturating_sub(1) {
            let (head, tail) = self.segments.split_at_mut(i + 1);
            let a = &mut head[i];
            let b = &mut tail[0];

            let weight_a = if a.pinned { 0.0 } else { 1.0 };
            let weight_b = if b.pinned { 0.0 } else { 1.0 };
            let total = weight_a + weight_b;
            if total == 0.0 {
                continue;
            }

            let delta = b.pos - a.pos;
            let distance = delta.length().max(MIN_DISTANCE);
            let correction = delta * ((rest_length - distance) / distance);

            a.pos -= correction * (weight_a / total);
            b.pos += correction * (weight_b / total);
        }
    }

    fn push_out_of_striker(&mut self, striker_pos: Vec2, striker_radius: f32) {
        let clearance = striker_radius + self.params.collision_radius;

        for segment in self.segments.iter_mut().skip(1) {
            let distance = segment.pos.distance(striker_pos);
            if distance < clearance && distance > MIN_DISTANCE {
                let (normal, _) = floored_normal(striker_pos, segment.pos);
                segment.pos += normal * (clearance - distance);
            }
        }
    }

    /// Where the hammer hangs: the last segment, as left by the solver
    pub fn tip(&self) -> Vec2 {
        self.segments.last().map(|s| s.pos).unwrap_or_default()
    }

    pub fn anchor(&self) -> Vec2 {
        self.segments.first().map(|s| s.pos).unwrap_or_default()
    }

    /// Segment positions in order, for drawing
    pub fn points(&self) -> Vec<Vec2> {
        self.segments.iter().map(|s| s.pos).collect()
    }

    /// Distances between neighbouring segments
    pub fn link_lengths(&self) -> Vec<f32> {
        self.segments
            .windows(2)
            .map(|pair| pair[0].pos.distance(pair[1].pos))
            .collect()
    }
}
