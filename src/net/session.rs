//! Match-side half of networking
//!
//! The host owns the puck and the score and sends snapshots; the guest
//! mirrors them. Each peer drives its own striker from local input and the
//! other striker from the most recent relayed input. There are no sequence
//! numbers: the last message received wins.

use serde::{Deserialize, Serialize};

use super::protocol::{ClientMessage, NetSnapshot, RelayMessage};
use crate::consts::SNAPSHOT_INTERVAL_SECS;
use crate::sim::{ControlInput, DirectionFlags, MatchState, Player, TickInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Authoritative for puck, scores and clock
    Host,
    Guest,
}

#[derive(Debug, Clone)]
pub struct NetSession {
    role: Role,
    local: Player,
    remote_input: Option<ControlInput>,
    last_snapshot_at: Option<f64>,
}

impl NetSession {
    pub fn new(role: Role, local: Player) -> Self {
        Self {
            role,
            local,
            remote_input: None,
            last_snapshot_at: None,
        }
    }

    /// The room creator hosts
    pub fn for_seat(local: Player) -> Self {
        let role = match local {
            Player::One => Role::Host,
            Player::Two => Role::Guest,
        };
        Self::new(role, local)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn local(&self) -> Player {
        self.local
    }

    pub fn remote(&self) -> Player {
        self.local.opponent()
    }

    /// Merge this tick's local control with the latest remote one. A guest
    /// tick never scores or ends the match on its own.
    pub fn tick_input(&self, local: Option<ControlInput>) -> TickInput {
        let mut input = TickInput::default();
        input.controls[self.local.index()] = local;
        input.controls[self.remote().index()] = self.remote_input;
        input.mirror = self.role == Role::Guest;
        input
    }

    /// Messages to send after a tick: local input always, plus a snapshot
    /// from the host when the interval has elapsed
    pub fn outgoing(
        &mut self,
        state: &MatchState,
        local: Option<ControlInput>,
        now: f64,
    ) -> Vec<ClientMessage> {
        // Remote inputs persist, so "no input" goes out as an explicit hold
        let input = local.unwrap_or(ControlInput::Directional(DirectionFlags::default()));
        let mut out = vec![ClientMessage::PlayerInput { input }];

        if self.role == Role::Host && self.snapshot_due(now) {
            self.last_snapshot_at = Some(now);
            out.push(ClientMessage::GameState {
                snapshot: NetSnapshot::capture(state, now),
            });
        }
        out
    }

    fn snapshot_due(&self, now: f64) -> bool {
        self.last_snapshot_at
            .is_none_or(|last| now - last >= SNAPSHOT_INTERVAL_SECS)
    }

    /// Record a relayed input. Inputs claiming to be for our own seat are
    /// ignored.
    pub fn receive_input(&mut self, player: Player, input: ControlInput) {
        if player == self.remote() {
            self.remote_input = Some(input);
        }
    }

    /// Mirror the host's snapshot. The host ignores snapshots.
    pub fn receive_snapshot(&self, state: &mut MatchState, snapshot: &NetSnapshot, now: f64) {
        if self.role == Role::Guest {
            snapshot.apply(state, now);
        }
    }

    /// Route one relay message; lobby messages are left to the caller
    pub fn handle(&mut self, state: &mut MatchState, message: &RelayMessage, now: f64) {
        match message {
            RelayMessage::PlayerInput { player, input } => self.receive_input(*player, *input),
            RelayMessage::GameState { snapshot } => self.receive_snapshot(state, snapshot, now),
            RelayMessage::PlayerDisconnected { player } if *player == self.remote() => {
                self.remote_input = None;
            }
            _ => {}
        }
    }
}
