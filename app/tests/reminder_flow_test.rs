//! Integration tests for the due-date reminder flow.
//!
//! These tests drive the scheduler end to end across restarts and verify
//! that audible and haptic cues respect the user's channel toggles.

use std::sync::{Arc, Mutex};

use taskdeck::cues::{CueSink, RecordingCues};
use taskdeck::notifier::{Notifier, TOAST_TTL_MS};
use taskdeck::settings::Settings;
use taskdeck::storage::Storage;
use taskdeck::store::TaskStore;

// =============================================================================
// Test Helpers
// =============================================================================

/// Cue sink that shares its counters with the test body, since the
/// scheduler takes ownership of the sink it is given.
#[derive(Clone, Default)]
struct SharedCues(Arc<Mutex<RecordingCues>>);

impl SharedCues {
    fn beeps(&self) -> usize {
        self.0.lock().expect("cue lock").beeps
    }

    fn vibrations(&self) -> usize {
        self.0.lock().expect("cue lock").vibrations
    }
}

impl CueSink for SharedCues {
    fn beep(&mut self) {
        self.0.lock().expect("cue lock").beep();
    }

    fn vibrate(&mut self) {
        self.0.lock().expect("cue lock").vibrate();
    }
}

fn store_in(dir: &tempfile::TempDir) -> TaskStore {
    TaskStore::load(Storage::new(dir.path().join("state")))
}

// =============================================================================
// Cue Gating
// =============================================================================

/// Verifies that an alert batch fires each enabled cue exactly once, no
/// matter how many tasks became due in the batch.
#[test]
fn test_alert_batch_fires_cues_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store_in(&dir);
    let settings = Settings::default();

    for i in 0..3 {
        let id = store.add(&format!("t{i}")).expect("task created");
        store.set_due(&id, Some(100));
    }

    let cues = SharedCues::default();
    let mut notifier = Notifier::new(Box::new(cues.clone()));
    notifier.tick(&mut store, &settings, 200);

    assert_eq!(notifier.toasts().len(), 3);
    assert_eq!(cues.beeps(), 1);
    assert_eq!(cues.vibrations(), 1);
}

/// Verifies that the sound and vibration toggles gate their cues
/// independently while the toast still appears.
#[test]
fn test_cue_channels_are_independent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store_in(&dir);
    let mut settings = Settings::default();
    settings.sound = false;

    let id = store.add("quiet").expect("task created");
    store.set_due(&id, Some(100));

    let cues = SharedCues::default();
    let mut notifier = Notifier::new(Box::new(cues.clone()));
    notifier.tick(&mut store, &settings, 200);

    assert_eq!(notifier.toasts().len(), 1);
    assert_eq!(cues.beeps(), 0);
    assert_eq!(cues.vibrations(), 1);
}

/// Verifies that disabling notifications entirely suppresses toasts and
/// cues both, and leaves the deadline able to alert later.
#[test]
fn test_disabled_notifications_fire_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store_in(&dir);
    let mut settings = Settings::default();
    settings.notifications = false;

    let id = store.add("muted").expect("task created");
    store.set_due(&id, Some(100));

    let cues = SharedCues::default();
    let mut notifier = Notifier::new(Box::new(cues.clone()));
    notifier.tick(&mut store, &settings, 200);

    assert!(notifier.toasts().is_empty());
    assert_eq!(cues.beeps(), 0);
    assert_eq!(cues.vibrations(), 0);

    settings.notifications = true;
    notifier.tick(&mut store, &settings, 300);
    assert_eq!(notifier.toasts().len(), 1);
}

// =============================================================================
// Restart Flow
// =============================================================================

/// Drives the full flow across a restart: deadlines missed while the
/// application was closed collapse into one sweep toast, later deadlines
/// alert individually, and nothing alerts twice.
#[test]
fn test_restart_sweep_then_tick_alerts_each_deadline_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = Settings::default();
    let later_id;

    {
        let mut store = store_in(&dir);
        for i in 0..2 {
            let id = store.add(&format!("missed {i}")).expect("task created");
            store.set_due(&id, Some(1_000 + i));
        }
        later_id = store.add("upcoming").expect("task created");
        store.set_due(&later_id, Some(50_000));
    }

    // "Restart": fresh store and scheduler over the same storage.
    let mut store = store_in(&dir);
    let cues = SharedCues::default();
    let mut notifier = Notifier::new(Box::new(cues.clone()));

    notifier.sweep(&mut store, &settings, 10_000);
    assert_eq!(notifier.toasts().len(), 1);
    assert!(notifier.toasts()[0].text.contains("2 tasks"));
    assert_eq!(cues.beeps(), 1);

    // The upcoming deadline is untouched by the sweep and fires on its own
    // tick, once.
    notifier.tick(&mut store, &settings, 50_000);
    assert_eq!(notifier.toasts().len(), 2);
    assert_eq!(cues.beeps(), 2);

    notifier.tick(&mut store, &settings, 110_000);
    assert_eq!(notifier.toasts().len(), 2);
    assert_eq!(cues.beeps(), 2);
}

/// Verifies that sweep and tick toasts share the expiry clock: each toast
/// lives its own TTL from creation.
#[test]
fn test_toast_expiry_is_per_toast() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store_in(&dir);
    let settings = Settings::default();

    let first = store.add("first").expect("task created");
    store.set_due(&first, Some(100));
    let second = store.add("second").expect("task created");
    store.set_due(&second, Some(5_000));

    let mut notifier = Notifier::new(Box::new(SharedCues::default()));
    notifier.tick(&mut store, &settings, 1_000);
    notifier.tick(&mut store, &settings, 5_000);
    assert_eq!(notifier.toasts().len(), 2);

    // Past the first toast's lifetime but within the second's.
    notifier.expire(1_000 + TOAST_TTL_MS);
    let remaining: Vec<&str> = notifier.toasts().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(remaining, vec!["Due now: second"]);

    notifier.expire(5_000 + TOAST_TTL_MS);
    assert!(notifier.toasts().is_empty());
}
