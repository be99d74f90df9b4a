//! Threaded relay connection
//!
//! A reader thread and a writer thread own the socket; the game loop only
//! pushes into and drains crossbeam channels, so it never blocks on the
//! network. A message that has not arrived yet just means no update this
//! tick.

use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use super::NetError;
use super::protocol::{ClientMessage, NetSnapshot, RelayMessage, read_frame, write_frame};
use crate::sim::{ControlInput, Player};

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    InRoom { room_id: String, player: Player },
    Error(String),
}

/// Lobby traffic plus the reader's exit notice
enum Inbound {
    Lobby(RelayMessage),
    Closed(Option<String>),
}

pub struct NetClient {
    stream: TcpStream,
    outgoing: Sender<ClientMessage>,
    lobby: Receiver<Inbound>,
    inputs: Receiver<(Player, ControlInput)>,
    states: Receiver<NetSnapshot>,
    state: ConnectionState,
}

impl NetClient {
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self, NetError> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        let (outgoing, to_send) = crossbeam_channel::unbounded();
        let (lobby_tx, lobby) = crossbeam_channel::unbounded();
        let (inputs_tx, inputs) = crossbeam_channel::unbounded();
        let (states_tx, states) = crossbeam_channel::unbounded();

        let writer = stream.try_clone()?;
        thread::spawn(move || write_loop(writer, to_send));

        let reader = stream.try_clone()?;
        thread::spawn(move || read_loop(reader, lobby_tx, inputs_tx, states_tx));

        log::info!("Connected to relay at {}", stream.peer_addr()?);
        Ok(Self {
            stream,
            outgoing,
            lobby,
            inputs,
            states,
            state: ConnectionState::Connected,
        })
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        matches!(
            self.state,
            ConnectionState::Connected | ConnectionState::InRoom { .. }
        )
    }

    /// Room id and seat, once the relay has confirmed them
    pub fn room(&self) -> Option<(&str, Player)> {
        match &self.state {
            ConnectionState::InRoom { room_id, player } => Some((room_id.as_str(), *player)),
            _ => None,
        }
    }

    pub fn create_room(&self) -> Result<(), NetError> {
        self.send(ClientMessage::CreateRoom)
    }

    pub fn join_room(&self, room_id: &str) -> Result<(), NetError> {
        self.send(ClientMessage::JoinRoom {
            room_id: room_id.to_string(),
        })
    }

    pub fn send_input(&self, input: ControlInput) -> Result<(), NetError> {
        self.send(ClientMessage::PlayerInput { input })
    }

    pub fn send_state(&self, snapshot: NetSnapshot) -> Result<(), NetError> {
        self.send(ClientMessage::GameState { snapshot })
    }

    /// Queue a message for the writer thread
    pub fn send(&self, message: ClientMessage) -> Result<(), NetError> {
        if !self.is_connected() {
            return Err(NetError::Disconnected);
        }
        self.outgoing.send(message).map_err(|_| NetError::Disconnected)
    }

    /// Drain lobby messages (room and seat changes, relay errors) and update
    /// the connection state from them
    pub fn poll_messages(&mut self) -> Vec<RelayMessage> {
        let mut messages = Vec::new();
        while let Ok(inbound) = self.lobby.try_recv() {
            match inbound {
                Inbound::Lobby(message) => {
                    match &message {
                        RelayMessage::RoomCreated { room_id, player }
                        | RelayMessage::RoomJoined { room_id, player } => {
                            self.state = ConnectionState::InRoom {
                                room_id: room_id.clone(),
                                player: *player,
                            };
                        }
                        _ => {}
                    }
                    messages.push(message);
                }
                Inbound::Closed(None) => self.state = ConnectionState::Disconnected,
                Inbound::Closed(Some(reason)) => self.state = ConnectionState::Error(reason),
            }
        }
        messages
    }

    /// Drain relayed inputs, oldest first
    pub fn poll_inputs(&self) -> Vec<(Player, ControlInput)> {
        self.inputs.try_iter().collect()
    }

    /// Drain relayed snapshots, oldest first
    pub fn poll_states(&self) -> Vec<NetSnapshot> {
        self.states.try_iter().collect()
    }
}

impl Drop for NetClient {
    fn drop(&mut self) {
        // Unblocks the reader; the writer exits once `outgoing` is dropped
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

fn write_loop(mut stream: TcpStream, to_send: Receiver<ClientMessage>) {
    for message in to_send.iter() {
        if let Err(e) = write_frame(&mut stream, &message) {
            log::warn!("Relay write failed: {}", e);
            break;
        }
    }
}

fn read_loop(
    mut stream: TcpStream,
    lobby: Sender<Inbound>,
    inputs: Sender<(Player, ControlInput)>,
    states: Sender<NetSnapshot>,
) {
    let reason = loop {
        match read_frame::<_, RelayMessage>(&mut stream) {
            Ok(RelayMessage::PlayerInput { player, input }) => {
                let _ = inputs.send((player, input));
            }
            Ok(RelayMessage::GameState { snapshot }) => {
                let _ = states.send(snapshot);
            }
            Ok(message) => {
                log::debug!("Relay: {:?}", message);
                let _ = lobby.send(Inbound::Lobby(message));
            }
            Err(NetError::Codec(e)) => log::warn!("Dropped malformed relay message: {}", e),
            Err(NetError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break None,
            Err(e) => break Some(e.to_string()),
        }
    };

    log::info!("Relay connection closed");
    let _ = lobby.send(Inbound::Closed(reason));
}
