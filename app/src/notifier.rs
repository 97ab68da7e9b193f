//! The due-date notification scheduler.
//!
//! [`Notifier`] owns the toast collection and drives the per-task alert
//! state machine:
//!
//! ```text
//! no-due --> pending --> due-unnotified --> notified
//!              (due_at set)   (due_at <= now)    (terminal until due_at changes)
//! ```
//!
//! A periodic [`tick`](Notifier::tick) recomputes "now" and fires exactly
//! one toast per task whose deadline has newly elapsed, accompanied by
//! optional audible/haptic cues and a [`mark_due_notified`]
//! call — the only task mutation the scheduler is allowed to make.
//!
//! A one-time [`sweep`](Notifier::sweep) at activation collapses every task
//! that became overdue while the application was closed into a single
//! aggregate toast, avoiding a flood of individual alerts.
//!
//! Toasts expire [`TOAST_TTL_MS`] after creation; expiry and user dismissal
//! are both idempotent.
//!
//! [`mark_due_notified`]: crate::store::TaskStore::mark_due_notified

use tracing::{debug, info};

use crate::cues::CueSink;
use crate::settings::Settings;
use crate::store::TaskStore;
use crate::types::{Millis, Toast};

/// Toast lifetime in milliseconds.
pub const TOAST_TTL_MS: Millis = 8_000;

/// Default period between due-scans, in seconds.
pub const DEFAULT_TICK_SECS: u64 = 60;

/// Owns the toast collection and fires one-shot due-alerts.
pub struct Notifier {
    toasts: Vec<Toast>,
    cues: Box<dyn CueSink>,
    swept: bool,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("toasts", &self.toasts)
            .field("swept", &self.swept)
            .finish_non_exhaustive()
    }
}

impl Notifier {
    /// Creates a scheduler with the given cue sink.
    #[must_use]
    pub fn new(cues: Box<dyn CueSink>) -> Self {
        Self {
            toasts: Vec::new(),
            cues,
            swept: false,
        }
    }

    /// Live toasts, oldest first.
    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// One-time startup sweep.
    ///
    /// Detects tasks already overdue and unnotified, emits a single
    /// aggregate toast summarizing the count, and marks them all notified
    /// in one pass. Subsequent calls are no-ops; newly-elapsing deadlines
    /// are handled per-task by [`tick`](Self::tick).
    pub fn sweep(&mut self, store: &mut TaskStore, settings: &Settings, now: Millis) {
        if self.swept {
            return;
        }
        self.swept = true;

        if !settings.notifications {
            return;
        }

        let overdue: Vec<String> = store
            .tasks()
            .iter()
            .filter(|t| t.is_due_unnotified(now))
            .map(|t| t.id.clone())
            .collect();
        if overdue.is_empty() {
            return;
        }

        info!(count = overdue.len(), "startup sweep found overdue tasks");
        let text = if overdue.len() == 1 {
            "1 task became due while you were away".to_string()
        } else {
            format!("{} tasks became due while you were away", overdue.len())
        };
        self.toasts.push(Toast::new("sweep", text, now));
        store.mark_all_due_notified(&overdue, now);
        self.fire_cues(settings);
    }

    /// Periodic due-scan.
    ///
    /// Emits exactly one toast per task whose deadline has elapsed since it
    /// was last notified, fires cues once per batch, and marks each task
    /// notified. Completed tasks are never considered. Disabling the master
    /// notifications setting suspends the scan entirely, leaving pending
    /// deadlines able to alert after re-enabling.
    pub fn tick(&mut self, store: &mut TaskStore, settings: &Settings, now: Millis) {
        if !settings.notifications {
            return;
        }

        let due: Vec<(String, String)> = store
            .tasks()
            .iter()
            .filter(|t| t.is_due_unnotified(now))
            .map(|t| (t.id.clone(), t.text.clone()))
            .collect();
        if due.is_empty() {
            return;
        }

        for (id, text) in &due {
            debug!(id = %id, "due-alert fired");
            self.toasts
                .push(Toast::new(id, format!("Due now: {text}"), now));
            store.mark_due_notified(id, now);
        }
        self.fire_cues(settings);
    }

    /// Removes toasts whose lifetime has elapsed. Idempotent.
    pub fn expire(&mut self, now: Millis) {
        self.toasts.retain(|t| now - t.created_at < TOAST_TTL_MS);
    }

    /// Removes a toast by id. Idempotent; unknown ids are ignored.
    pub fn dismiss(&mut self, toast_id: &str) {
        self.toasts.retain(|t| t.id != toast_id);
    }

    /// Removes the most recently created toast, if any.
    pub fn dismiss_newest(&mut self) {
        self.toasts.pop();
    }

    fn fire_cues(&mut self, settings: &Settings) {
        if settings.sound {
            self.cues.beep();
        }
        if settings.vibration {
            self.cues.vibrate();
        }
    }
}
