//! Dark-mode preference store
//!
//! Precedence: an explicit user choice, once made, always wins and is
//! persisted. Until then the live system signal is authoritative and is
//! deliberately never written to storage, so a later system-level change
//! keeps being honored.

use crate::storage::{KeyValueStorage, DARK_MODE_KEY};
use parking_lot::RwLock;
use std::sync::Arc;

pub struct PreferenceStore {
    storage: Arc<dyn KeyValueStorage>,
    /// Explicit stored choice, if one has ever been made.
    explicit: RwLock<Option<bool>>,
    /// Last observed system-level light/dark signal.
    system_dark: RwLock<bool>,
}

impl PreferenceStore {
    /// `system_dark` is the system preference observed at startup.
    pub fn new(storage: Arc<dyn KeyValueStorage>, system_dark: bool) -> Self {
        // An unparseable stored value counts as "no explicit choice".
        let explicit = storage
            .get(DARK_MODE_KEY)
            .and_then(|raw| raw.parse::<bool>().ok());
        Self {
            storage,
            explicit: RwLock::new(explicit),
            system_dark: RwLock::new(system_dark),
        }
    }

    /// Effective mode under the precedence rule.
    pub fn is_dark(&self) -> bool {
        self.explicit.read().unwrap_or(*self.system_dark.read())
    }

    /// Flip the effective mode and persist it as an explicit choice.
    /// Returns the new value for the presentation layer to apply.
    pub fn toggle_dark_mode(&self) -> bool {
        let next = !self.is_dark();
        self.storage.set(DARK_MODE_KEY, if next { "true" } else { "false" });
        *self.explicit.write() = Some(next);
        next
    }

    /// Feed a changed system-level signal. Only affects the effective mode
    /// while no explicit choice exists.
    pub fn set_system_dark(&self, dark: bool) {
        *self.system_dark.write() = dark;
    }

    pub fn has_explicit_choice(&self) -> bool {
        self.explicit.read().is_some()
    }
}
