//! Key-value persistence for Taskdeck.
//!
//! All durable state lives in a small synchronous key-value store: one
//! directory, one file per key. The task collection is a single JSON array
//! under the [`TASKS_KEY`] entry; settings are individual `"1"`/`"0"`
//! entries (see the [`settings`](crate::settings) module).
//!
//! # Failure policy
//!
//! Persistence is strictly best-effort and never surfaces errors to the
//! caller:
//!
//! - **Reads** degrade to "absent". A missing file, unreadable file, or
//!   unparsable document all behave as if nothing was stored.
//! - **Task validation is all-or-nothing**: if any element of the stored
//!   array is malformed, the whole load falls back to the empty collection
//!   rather than resurrecting a partially-corrupt state.
//! - **Writes** are fire-and-forget. Failures are logged at warn level and
//!   swallowed; loss only affects durability, not in-memory correctness for
//!   the current session.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::types::Task;

/// Entry key for the task collection document.
pub const TASKS_KEY: &str = "tasks";

/// A synchronous key-value store rooted at a directory.
///
/// Cloning is cheap; clones share the same root directory. The store is
/// single-writer by construction (the application is single-threaded from
/// the store's perspective), so no cross-process coordination is attempted.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a store rooted at `root`. The directory is created lazily on
    /// first write.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Returns the root directory of this store.
    #[must_use]
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Reads the raw value for `key`, or `None` if absent or unreadable.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.root.join(key)).ok()
    }

    /// Writes the raw value for `key`, overwriting any prior content.
    ///
    /// Failures (permissions, disk full) are logged and swallowed.
    pub fn set(&self, key: &str, value: &str) {
        if let Err(e) = fs::create_dir_all(&self.root) {
            warn!(key, error = %e, "failed to create storage directory");
            return;
        }
        if let Err(e) = fs::write(self.root.join(key), value) {
            warn!(key, error = %e, "failed to persist entry");
        }
    }

    /// Removes the entry for `key`, if present. Best-effort.
    pub fn remove(&self, key: &str) {
        let path = self.root.join(key);
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                warn!(key, error = %e, "failed to remove entry");
            }
        }
    }

    /// Loads the task collection.
    ///
    /// Returns the empty collection if the entry is absent, is not valid
    /// JSON, or contains any element that is not a well-formed task record.
    /// Never returns an error.
    #[must_use]
    pub fn load_tasks(&self) -> Vec<Task> {
        let Some(raw) = self.get(TASKS_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                debug!(count = tasks.len(), "loaded task collection");
                tasks
            }
            Err(e) => {
                warn!(error = %e, "discarding malformed task document");
                Vec::new()
            }
        }
    }

    /// Serializes and writes the full task collection unconditionally.
    ///
    /// Fire-and-forget: serialization or write failures are logged and
    /// swallowed.
    pub fn save_tasks(&self, tasks: &[Task]) {
        match serde_json::to_string(tasks) {
            Ok(json) => self.set(TASKS_KEY, &json),
            Err(e) => warn!(error = %e, "failed to serialize task collection"),
        }
    }
}
