//! Network protocol for Chain Hockey
//!
//! Uses postcard for compact binary serialization. TCP is a byte stream, so
//! every message travels as a 4-byte little-endian length followed by the
//! postcard body.

use std::io::{Read, Write};

use glam::Vec2;
use postcard::{from_bytes, to_allocvec};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::NetError;
use crate::sim::{ControlInput, MatchState, Outcome, Player};

/// Largest accepted message body
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Room ids are this many uppercase letters and digits
pub const ROOM_ID_LEN: usize = 6;

pub const DEFAULT_RELAY_ADDR: &str = "0.0.0.0:8765";

/// Authoritative puck and score state, sent by the host about 10 times a second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetSnapshot {
    pub puck_pos: Vec2,
    pub puck_vel: Vec2,
    pub scores: [u32; 2],
    pub time_remaining: f64,
    pub game_over: bool,
}

impl NetSnapshot {
    pub fn capture(state: &MatchState, now: f64) -> Self {
        Self {
            puck_pos: state.puck.pos,
            puck_vel: state.puck.vel,
            scores: state.scores,
            time_remaining: state.time_remaining(now),
            game_over: state.is_over(),
        }
    }

    /// Overwrite the mirrored parts of `state`. Everything else (the local
    /// rig, the remote rig driven by relayed input) is left alone.
    pub fn apply(&self, state: &mut MatchState, now: f64) {
        state.puck.pos = self.puck_pos;
        state.puck.vel = self.puck_vel;
        state.scores = self.scores;
        state.goal_cooldown = 0;

        let duration = state.config.global.game_duration_seconds as f64;
        state
            .clock
            .sync_remaining(now, duration, self.time_remaining);

        if self.game_over {
            state.finish(Outcome::from_scores(self.scores));
        }
    }
}

// ============================================================================
// Client -> Relay
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientMessage {
    CreateRoom,
    JoinRoom { room_id: String },
    PlayerInput { input: ControlInput },
    GameState { snapshot: NetSnapshot },
}

// ============================================================================
// Relay -> Client
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelayMessage {
    /// Sent to the creator, who is always player one
    RoomCreated { room_id: String, player: Player },
    RoomJoined { room_id: String, player: Player },
    /// The other seat was filled
    PlayerConnected { player: Player },
    PlayerDisconnected { player: Player },
    PlayerInput { player: Player, input: ControlInput },
    GameState { snapshot: NetSnapshot },
    Error { message: String },
}

// ============================================================================
// Serialization Helpers
// ============================================================================

pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, NetError> {
    Ok(to_allocvec(message)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, NetError> {
    Ok(from_bytes(bytes)?)
}

/// Write one length-prefixed message and flush
pub fn write_frame<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<(), NetError> {
    let body = encode(message)?;
    if body.len() > MAX_FRAME_LEN {
        return Err(NetError::FrameTooLarge(body.len()));
    }
    writer.write_all(&(body.len() as u32).to_le_bytes())?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

/// Read one length-prefixed message.
///
/// A [`NetError::Codec`] means the frame was consumed but did not decode, so
/// the stream is still in sync. Any other error leaves it unusable.
pub fn read_frame<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T, NetError> {
    let mut len = [0u8; 4];
    reader.read_exact(&mut len)?;
    let len = u32::from_le_bytes(len) as usize;
    if len > MAX_FRAME_LEN {
        return Err(NetError::FrameTooLarge(len));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    decode(&body)
}
