//! Circle-circle collision primitives
//!
//! Pure functions over [`Circle`] values: overlap test, positional separation
//! and an impulse resolver along the contact normal. Degenerate (coincident)
//! centers never divide by zero; the distance is floored at
//! [`MIN_DISTANCE`](crate::consts::MIN_DISTANCE).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::floored_normal;

/// A circular body as seen by the collision pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
}

impl Circle {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            mass,
        }
    }
}

/// Whether two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: &Circle, b: &Circle) -> bool {
    a.pos.distance(b.pos) < a.radius + b.radius
}

/// Push two overlapping circles apart along their center line.
///
/// Each center moves half the penetration depth, independent of mass.
/// Returns the new `(a.pos, b.pos)`; non-overlapping input is returned as is.
pub fn separate_overlap(a: &Circle, b: &Circle) -> (Vec2, Vec2) {
    let (normal, distance) = floored_normal(a.pos, b.pos);
    let overlap = (a.radius + b.radius) - distance;

    if overlap > 0.0 {
        let push = normal * overlap * 0.5;
        (a.pos - push, b.pos + push)
    } else {
        (a.pos, b.pos)
    }
}

/// Impulse response along the contact normal.
///
/// `restitution` belongs to the pair, not the bodies: values above 1 add
/// energy, values below 1 remove it. Bodies already moving apart are left
/// untouched. Returns the new `(a.vel, b.vel)`.
pub fn resolve_elastic_collision(a: &Circle, b: &Circle, restitution: f32) -> (Vec2, Vec2) {
    let (normal, _) = floored_normal(a.pos, b.pos);

    // Relative velocity of a with respect to b, projected on the normal
    let dvn = (a.vel - b.vel).dot(normal);
    if dvn < 0.0 {
        return (a.vel, b.vel);
    }

    let impulse = -(1.0 + restitution) * dvn / (1.0 / a.mass + 1.0 / b.mass);

    (
        a.vel + normal * (impulse / a.mass),
        b.vel - normal * (impulse / b.mass),
    )
}
