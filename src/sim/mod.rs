//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed timestep only (velocities are per tick)
//! - Stable iteration order (player one before player two)
//! - No rendering, storage or network dependencies

pub mod bodies;
pub mod chain;
pub mod clock;
pub mod collision;
pub mod state;
pub mod tick;
pub mod view;

pub use bodies::{ControlInput, DirectionFlags, GoalSide, Hammer, Puck, Striker};
pub use chain::{Chain, ChainParams, ChainSegment};
pub use clock::MatchClock;
pub use collision::{Circle, circles_overlap, resolve_elastic_collision, separate_overlap};
pub use state::{
    HitKind, MatchEvent, MatchPhase, MatchState, Outcome, Player, Rig, TableHalf,
};
pub use tick::{TickInput, tick};
pub use view::{BodyView, ChainView, GoalRect, RenderFrame};
