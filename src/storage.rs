//! Durable key-value storage
//!
//! The client persists exactly three entries: the bearer token, the
//! serialized user, and the dark-mode flag. The trait mirrors browser
//! localStorage semantics: reads and writes never fail from the caller's
//! point of view; IO problems degrade to "entry absent" and are logged.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Storage key for the raw bearer token.
pub const AUTH_TOKEN_KEY: &str = "authToken";
/// Storage key for the serialized session user.
pub const USER_KEY: &str = "user";
/// Storage key for the explicit dark-mode choice. Absent means
/// "follow the system preference".
pub const DARK_MODE_KEY: &str = "isDarkMode";

const STORAGE_FILE: &str = "marketdeck.json";

/// Process-durable string map
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// File-backed storage: one JSON object in the config directory.
///
/// Every mutation writes the whole map back synchronously, so a crash after
/// `set` returns can never lose the entry.
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStorage {
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        let path = config_dir.as_ref().join(STORAGE_FILE);
        let entries = Self::load(&path);
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn load(path: &Path) -> HashMap<String, String> {
        let Ok(raw) = fs::read_to_string(path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(err) => {
                warn!("Discarding unreadable storage file {:?}: {}", path, err);
                HashMap::new()
            }
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!("Failed to create storage dir {:?}: {}", parent, err);
                return;
            }
        }
        let raw = match serde_json::to_string_pretty(entries) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Failed to serialize storage: {}", err);
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, raw) {
            warn!("Failed to write storage file {:?}: {}", self.path, err);
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for the common `Arc<dyn KeyValueStorage>` wiring.
    pub fn shared() -> Arc<dyn KeyValueStorage> {
        Arc::new(Self::new())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}
