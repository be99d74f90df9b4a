//! Chain Hockey room relay
//!
//! Pairs two clients into a room and forwards inputs and snapshots between
//! them. The relay never runs the simulation.
//!
//! Usage: `chain-hockey-relay [bind_address]`
//! Default bind address: `0.0.0.0:8765`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use chain_hockey::net::RelayServer;
    use chain_hockey::net::protocol::DEFAULT_RELAY_ADDR;
    use chain_hockey::platform;

    platform::init_logging();

    let bind_addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_RELAY_ADDR.into());

    // Room ids only need to differ between runs
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();

    let server = match RelayServer::bind(&bind_addr, seed) {
        Ok(server) => server,
        Err(e) => {
            log::error!("Failed to bind to {}: {}", bind_addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        log::error!("Relay stopped: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The relay is native only; the library is what runs in the browser
}
