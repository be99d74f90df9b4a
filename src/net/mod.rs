//! Two-player networking
//!
//! The simulation never touches a socket. Peers exchange plain records
//! (control inputs, puck/score snapshots) through a TCP room relay:
//! - `protocol`: message types and length-prefixed postcard framing
//! - `relay`: room table and the relay server loop
//! - `client`: threaded connection with non-blocking polling
//! - `session`: turns match state into messages and back

#[cfg(not(target_arch = "wasm32"))]
pub mod client;
pub mod protocol;
pub mod relay;
pub mod session;

#[cfg(not(target_arch = "wasm32"))]
pub use client::{ConnectionState, NetClient};
pub use protocol::{ClientMessage, NetSnapshot, RelayMessage};
pub use relay::{ConnId, Delivery, RoomTable};
#[cfg(not(target_arch = "wasm32"))]
pub use relay::RelayServer;
pub use session::{NetSession, Role};

use std::fmt;

#[derive(Debug)]
pub enum NetError {
    Io(std::io::Error),
    /// Length prefix above [`protocol::MAX_FRAME_LEN`]
    FrameTooLarge(usize),
    Codec(postcard::Error),
    /// The connection's worker threads are gone
    Disconnected,
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::Io(e) => write!(f, "network i/o error: {e}"),
            NetError::FrameTooLarge(len) => {
                write!(f, "frame of {len} bytes exceeds {}", protocol::MAX_FRAME_LEN)
            }
            NetError::Codec(e) => write!(f, "malformed message: {e}"),
            NetError::Disconnected => write!(f, "disconnected"),
        }
    }
}

impl std::error::Error for NetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetError::Io(e) => Some(e),
            NetError::Codec(e) => Some(e),
            NetError::FrameTooLarge(_) | NetError::Disconnected => None,
        }
    }
}

impl From<std::io::Error> for NetError {
    fn from(e: std::io::Error) -> Self {
        NetError::Io(e)
    }
}

impl From<postcard::Error> for NetError {
    fn from(e: postcard::Error) -> Self {
        NetError::Codec(e)
    }
}
