//! Persisted user settings.
//!
//! Three independent notification flags plus the first-run hint dismissal
//! flag, each stored as its own key-value entry serialized as `"1"`/`"0"`.
//! Missing or unrecognized entries fall back to defaults (all notification
//! channels enabled, hint visible). Every toggle persists immediately.

use crate::storage::Storage;

/// Entry key for the master notifications flag.
pub const NOTIFICATIONS_KEY: &str = "notifications";

/// Entry key for the audible cue flag.
pub const SOUND_KEY: &str = "sound";

/// Entry key for the haptic cue flag.
pub const VIBRATION_KEY: &str = "vibration";

/// Entry key for the first-run hint dismissal flag.
pub const HINT_DISMISSED_KEY: &str = "hint-dismissed";

/// User-toggleable settings.
///
/// `notifications` gates due-alerts as a whole; `sound` and `vibration`
/// independently gate the audible and haptic cues that accompany an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Whether due-date alerts fire at all.
    pub notifications: bool,
    /// Whether an audible cue accompanies an alert.
    pub sound: bool,
    /// Whether a haptic cue accompanies an alert.
    pub vibration: bool,
    /// Whether the first-run hint panel has been dismissed.
    pub hint_dismissed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: true,
            sound: true,
            vibration: true,
            hint_dismissed: false,
        }
    }
}

impl Settings {
    /// Loads settings from storage, applying defaults for absent entries.
    #[must_use]
    pub fn load(storage: &Storage) -> Self {
        let defaults = Self::default();
        Self {
            notifications: load_flag(storage, NOTIFICATIONS_KEY, defaults.notifications),
            sound: load_flag(storage, SOUND_KEY, defaults.sound),
            vibration: load_flag(storage, VIBRATION_KEY, defaults.vibration),
            hint_dismissed: load_flag(storage, HINT_DISMISSED_KEY, defaults.hint_dismissed),
        }
    }

    /// Flips the master notifications flag and persists it.
    pub fn toggle_notifications(&mut self, storage: &Storage) {
        self.notifications = !self.notifications;
        save_flag(storage, NOTIFICATIONS_KEY, self.notifications);
    }

    /// Flips the audible cue flag and persists it.
    pub fn toggle_sound(&mut self, storage: &Storage) {
        self.sound = !self.sound;
        save_flag(storage, SOUND_KEY, self.sound);
    }

    /// Flips the haptic cue flag and persists it.
    pub fn toggle_vibration(&mut self, storage: &Storage) {
        self.vibration = !self.vibration;
        save_flag(storage, VIBRATION_KEY, self.vibration);
    }

    /// Marks the first-run hint as dismissed and persists it. Idempotent.
    pub fn dismiss_hint(&mut self, storage: &Storage) {
        if self.hint_dismissed {
            return;
        }
        self.hint_dismissed = true;
        save_flag(storage, HINT_DISMISSED_KEY, true);
    }
}

/// Reads a `"1"`/`"0"` flag entry, falling back to `default` for anything
/// else (absent entry, corrupt value).
fn load_flag(storage: &Storage, key: &str, default: bool) -> bool {
    match storage.get(key).as_deref() {
        Some("1") => true,
        Some("0") => false,
        _ => default,
    }
}

fn save_flag(storage: &Storage, key: &str, value: bool) {
    storage.set(key, if value { "1" } else { "0" });
}
