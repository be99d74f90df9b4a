//! Room relay for two-player matches
//!
//! The relay never interprets inputs or snapshots. It pairs two connections
//! into a room and forwards whatever one member sends to the other.
//!
//! [`RoomTable`] is the pure bookkeeping: every call returns the messages to
//! deliver, so it can be tested without sockets. [`RelayServer`] wraps it in
//! a TCP accept loop with one reader and one writer thread per connection.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::protocol::{ClientMessage, ROOM_ID_LEN, RelayMessage};
use crate::sim::Player;

/// Connection handle assigned by the server
pub type ConnId = u64;

const ROOM_ID_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A message bound for one connection
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub to: ConnId,
    pub message: RelayMessage,
}

impl Delivery {
    fn new(to: ConnId, message: RelayMessage) -> Self {
        Self { to, message }
    }

    fn error(to: ConnId, message: &str) -> Self {
        Self::new(
            to,
            RelayMessage::Error {
                message: message.to_string(),
            },
        )
    }
}

#[derive(Debug, Default)]
struct Room {
    /// Indexed by [`Player::index`]
    seats: [Option<ConnId>; 2],
}

impl Room {
    fn other(&self, player: Player) -> Option<ConnId> {
        self.seats[player.opponent().index()]
    }

    fn free_seat(&self) -> Option<Player> {
        Player::BOTH
            .into_iter()
            .find(|p| self.seats[p.index()].is_none())
    }

    fn is_empty(&self) -> bool {
        self.seats.iter().all(Option::is_none)
    }
}

/// Rooms and who sits where
pub struct RoomTable {
    rooms: HashMap<String, Room>,
    /// Connection -> (room id, seat)
    members: HashMap<ConnId, (String, Player)>,
    rng: Pcg32,
}

impl RoomTable {
    pub fn new(seed: u64) -> Self {
        Self {
            rooms: HashMap::new(),
            members: HashMap::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn seat_of(&self, conn: ConnId) -> Option<(&str, Player)> {
        self.members
            .get(&conn)
            .map(|(room_id, player)| (room_id.as_str(), *player))
    }

    fn generate_room_id(&mut self) -> String {
        loop {
            let id: String = (0..ROOM_ID_LEN)
                .map(|_| ROOM_ID_CHARS[self.rng.random_range(0..ROOM_ID_CHARS.len())] as char)
                .collect();
            if !self.rooms.contains_key(&id) {
                return id;
            }
        }
    }

    /// Apply one message from `from` and return what to send where
    pub fn handle(&mut self, from: ConnId, message: ClientMessage) -> Vec<Delivery> {
        match message {
            ClientMessage::CreateRoom => self.create_room(from),
            ClientMessage::JoinRoom { room_id } => self.join_room(from, &room_id),
            ClientMessage::PlayerInput { input } => {
                self.forward(from, |player| RelayMessage::PlayerInput { player, input })
            }
            ClientMessage::GameState { snapshot } => {
                self.forward(from, |_| RelayMessage::GameState { snapshot })
            }
        }
    }

    fn create_room(&mut self, from: ConnId) -> Vec<Delivery> {
        if self.members.contains_key(&from) {
            return vec![Delivery::error(from, "Already in a room")];
        }

        let room_id = self.generate_room_id();
        let mut room = Room::default();
        room.seats[Player::One.index()] = Some(from);
        self.rooms.insert(room_id.clone(), room);
        self.members.insert(from, (room_id.clone(), Player::One));
        log::info!("Room created: {} by connection {}", room_id, from);

        vec![Delivery::new(
            from,
            RelayMessage::RoomCreated {
                room_id,
                player: Player::One,
            },
        )]
    }

    fn join_room(&mut self, from: ConnId, requested: &str) -> Vec<Delivery> {
        if self.members.contains_key(&from) {
            return vec![Delivery::error(from, "Already in a room")];
        }

        let room_id = requested.trim().to_ascii_uppercase();
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return vec![Delivery::error(from, "Room not found")];
        };
        let Some(player) = room.free_seat() else {
            return vec![Delivery::error(from, "Room is full")];
        };

        room.seats[player.index()] = Some(from);
        let other = room.other(player);
        self.members.insert(from, (room_id.clone(), player));
        log::info!(
            "Connection {} joined room {} as {:?}",
            from,
            room_id,
            player
        );

        let mut out = vec![Delivery::new(
            from,
            RelayMessage::RoomJoined { room_id, player },
        )];
        if let Some(other) = other {
            out.push(Delivery::new(other, RelayMessage::PlayerConnected { player }));
        }
        out
    }

    fn forward(
        &self,
        from: ConnId,
        build: impl FnOnce(Player) -> RelayMessage,
    ) -> Vec<Delivery> {
        let Some((room_id, player)) = self.members.get(&from) else {
            return Vec::new();
        };
        let other = self.rooms.get(room_id).and_then(|room| room.other(*player));

        match other {
            Some(other) => vec![Delivery::new(other, build(*player))],
            None => Vec::new(),
        }
    }

    /// Drop `conn` from its room, tell the other member, remove empty rooms
    pub fn disconnect(&mut self, conn: ConnId) -> Vec<Delivery> {
        let Some((room_id, player)) = self.members.remove(&conn) else {
            return Vec::new();
        };
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return Vec::new();
        };

        room.seats[player.index()] = None;
        let mut out = Vec::new();
        if let Some(other) = room.other(player) {
            out.push(Delivery::new(other, RelayMessage::PlayerDisconnected { player }));
        }
        if room.is_empty() {
            self.rooms.remove(&room_id);
            log::info!("Room {} removed (empty)", room_id);
        }
        out
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use server::RelayServer;

#[cfg(not(target_arch = "wasm32"))]
mod server {
    use std::collections::HashMap;
    use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};
    use std::thread;

    use crossbeam_channel::{Receiver, Sender};

    use super::{ConnId, Delivery, RoomTable};
    use crate::net::NetError;
    use crate::net::protocol::{ClientMessage, RelayMessage, read_frame, write_frame};

    struct Shared {
        table: Mutex<RoomTable>,
        outboxes: Mutex<HashMap<ConnId, Sender<RelayMessage>>>,
        next_id: AtomicU64,
    }

    impl Shared {
        fn dispatch(&self, deliveries: Vec<Delivery>) {
            if deliveries.is_empty() {
                return;
            }
            let outboxes = self.outboxes.lock().unwrap_or_else(PoisonError::into_inner);
            for delivery in deliveries {
                if let Some(outbox) = outboxes.get(&delivery.to) {
                    // A closed outbox means that connection is tearing down
                    let _ = outbox.send(delivery.message);
                }
            }
        }

        fn table(&self) -> std::sync::MutexGuard<'_, RoomTable> {
            self.table.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// TCP relay: accepts connections and pairs them into rooms
    pub struct RelayServer {
        listener: TcpListener,
        shared: Arc<Shared>,
    }

    impl RelayServer {
        pub fn bind(addr: impl ToSocketAddrs, seed: u64) -> Result<Self, NetError> {
            let listener = TcpListener::bind(addr)?;
            Ok(Self {
                listener,
                shared: Arc::new(Shared {
                    table: Mutex::new(RoomTable::new(seed)),
                    outboxes: Mutex::new(HashMap::new()),
                    next_id: AtomicU64::new(1),
                }),
            })
        }

        pub fn local_addr(&self) -> Result<SocketAddr, NetError> {
            Ok(self.listener.local_addr()?)
        }

        /// Accept connections forever
        pub fn run(self) -> Result<(), NetError> {
            log::info!("Relay listening on {}", self.local_addr()?);

            for stream in self.listener.incoming() {
                match stream {
                    Ok(stream) => {
                        let shared = Arc::clone(&self.shared);
                        let conn = shared.next_id.fetch_add(1, Ordering::Relaxed);
                        thread::spawn(move || {
                            if let Err(e) = serve_connection(&shared, conn, stream) {
                                log::warn!("Connection {} setup failed: {}", conn, e);
                            }
                        });
                    }
                    Err(e) => log::warn!("Accept failed: {}", e),
                }
            }
            Ok(())
        }
    }

    fn serve_connection(shared: &Shared, conn: ConnId, stream: TcpStream) -> Result<(), NetError> {
        let peer = stream.peer_addr()?;
        stream.set_nodelay(true)?;
        log::info!("Client connected: {} (connection {})", peer, conn);

        let (tx, rx) = crossbeam_channel::unbounded();
        let writer_stream = stream.try_clone()?;
        thread::spawn(move || write_loop(writer_stream, rx));
        shared
            .outboxes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(conn, tx);

        let mut reader = stream.try_clone()?;
        loop {
            match read_frame::<_, ClientMessage>(&mut reader) {
                Ok(message) => {
                    log::debug!("Connection {} sent {:?}", conn, message);
                    let deliveries = shared.table().handle(conn, message);
                    shared.dispatch(deliveries);
                }
                Err(NetError::Codec(e)) => {
                    log::warn!("Bad message from connection {}: {}", conn, e);
                    shared.dispatch(vec![Delivery::error(conn, "Malformed message")]);
                }
                Err(e) => {
                    log::info!("Client disconnected: {} ({})", peer, e);
                    break;
                }
            }
        }

        let deliveries = shared.table().disconnect(conn);
        shared.dispatch(deliveries);
        // Dropping the outbox ends the writer thread
        shared
            .outboxes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&conn);
        let _ = stream.shutdown(Shutdown::Both);
        Ok(())
    }

    fn write_loop(mut stream: TcpStream, outbox: Receiver<RelayMessage>) {
        for message in outbox.iter() {
            if let Err(e) = write_frame(&mut stream, &message) {
                log::debug!("Write failed, closing writer: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ControlInput, DirectionFlags};

    fn created_room(table: &mut RoomTable, conn: ConnId) -> String {
        match table.handle(conn, ClientMessage::CreateRoom).remove(0).message {
            RelayMessage::RoomCreated { room_id, player } => {
                assert_eq!(player, Player::One);
                room_id
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_room_ids_are_six_uppercase_alphanumerics() {
        let mut table = RoomTable::new(7);
        for conn in 0..50 {
            let id = created_room(&mut table, conn);
            assert_eq!(id.len(), ROOM_ID_LEN);
            assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
        assert_eq!(table.room_count(), 50);
    }

    #[test]
    fn test_join_notifies_creator() {
        let mut table = RoomTable::new(1);
        let id = created_room(&mut table, 1);

        let out = table.handle(
            2,
            ClientMessage::JoinRoom {
                room_id: id.to_lowercase(),
            },
        );
        assert_eq!(
            out,
            vec![
                Delivery::new(
                    2,
                    RelayMessage::RoomJoined {
                        room_id: id.clone(),
                        player: Player::Two
                    }
                ),
                Delivery::new(1, RelayMessage::PlayerConnected { player: Player::Two }),
            ]
        );
        assert_eq!(table.seat_of(2), Some((id.as_str(), Player::Two)));
    }

    #[test]
    fn test_join_errors() {
        let mut table = RoomTable::new(1);
        let out = table.handle(
            9,
            ClientMessage::JoinRoom {
                room_id: "NOPE00".into(),
            },
        );
        assert_eq!(out, vec![Delivery::error(9, "Room not found")]);

        let id = created_room(&mut table, 1);
        table.handle(2, ClientMessage::JoinRoom { room_id: id.clone() });
        let out = table.handle(3, ClientMessage::JoinRoom { room_id: id });
        assert_eq!(out, vec![Delivery::error(3, "Room is full")]);
    }

    #[test]
    fn test_forwarding_reaches_other_member_only() {
        let mut table = RoomTable::new(1);
        let id = created_room(&mut table, 1);

        let input = ControlInput::Directional(DirectionFlags {
            left: true,
            ..Default::default()
        });
        // Alone in the room: nothing to forward to
        assert!(table.handle(1, ClientMessage::PlayerInput { input }).is_empty());

        table.handle(2, ClientMessage::JoinRoom { room_id: id });
        let out = table.handle(2, ClientMessage::PlayerInput { input });
        assert_eq!(
            out,
            vec![Delivery::new(
                1,
                RelayMessage::PlayerInput {
                    player: Player::Two,
                    input
                }
            )]
        );

        // Not in any room
        assert!(table.handle(5, ClientMessage::PlayerInput { input }).is_empty());
    }

    #[test]
    fn test_disconnect_notifies_and_cleans_up() {
        let mut table = RoomTable::new(1);
        let id = created_room(&mut table, 1);
        table.handle(2, ClientMessage::JoinRoom { room_id: id.clone() });

        let out = table.disconnect(1);
        assert_eq!(
            out,
            vec![Delivery::new(2, RelayMessage::PlayerDisconnected { player: Player::One })]
        );
        assert_eq!(table.room_count(), 1);

        // The vacated seat can be taken again
        let out = table.handle(3, ClientMessage::JoinRoom { room_id: id });
        assert!(matches!(
            out[0].message,
            RelayMessage::RoomJoined {
                player: Player::One,
                ..
            }
        ));

        table.disconnect(2);
        table.disconnect(3);
        assert_eq!(table.room_count(), 0);
        assert!(table.disconnect(3).is_empty());
    }
}
