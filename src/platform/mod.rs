//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup
//! - Default configuration storage (LocalStorage on web, a JSON file natively)

use crate::persistence::ConfigStore;

/// LocalStorage key on web
#[cfg(target_arch = "wasm32")]
pub const STORAGE_KEY: &str = "chain_hockey_config";

/// Config file name on native, relative to the working directory
#[cfg(not(target_arch = "wasm32"))]
pub const CONFIG_FILE: &str = "config.json";

pub fn is_web() -> bool {
    cfg!(target_arch = "wasm32")
}

/// Install the logger once. Later calls are ignored.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Install the logger once. Later calls are ignored. `RUST_LOG` overrides
/// the default `info` level.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn ConfigStore> {
    Box::new(crate::persistence::LocalStorageStore::new(STORAGE_KEY))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn ConfigStore> {
    Box::new(crate::persistence::FileStore::new(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_defaults() {
        assert!(!is_web());
        init_logging();
        init_logging();
        let _ = default_store();
    }
}
