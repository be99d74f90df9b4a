//! Storage backends for the configuration bundle
//!
//! Features:
//! - One opaque JSON document per store
//! - Atomic file replacement on native (tmp -> final)
//! - LocalStorage on web
//! - In-memory store for tests and headless runs

mod store;

#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;
pub use store::{FileStore, MemoryStore};

use std::fmt;

/// A place the configuration document can be read from and written to
pub trait ConfigStore: Send {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&self, contents: &str) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    /// Backend missing or refusing access (no window, storage disabled)
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "i/o error: {e}"),
            StoreError::Unavailable(why) => write!(f, "storage unavailable: {why}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}
