//! Best-effort audible and haptic cues.
//!
//! Cues accompany due-alerts when the corresponding settings are enabled.
//! They are strictly best-effort: a sink must never fail, block, or panic
//! when the underlying capability is missing. The scheduler talks to the
//! [`CueSink`] trait so tests can observe cue activity without a terminal.

use std::io::{self, Write};

use tracing::trace;

/// A sink for alert cues. Implementations swallow all failures.
pub trait CueSink {
    /// Emits a short audible cue.
    fn beep(&mut self);

    /// Emits a haptic cue, where the platform has one.
    fn vibrate(&mut self);
}

/// Cue sink backed by the controlling terminal.
///
/// The audible cue is the terminal bell. There is no portable terminal
/// haptic channel, so `vibrate` is a logged no-op; absence of the
/// capability must not degrade anything else.
#[derive(Debug, Default)]
pub struct TerminalCues;

impl TerminalCues {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CueSink for TerminalCues {
    fn beep(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }

    fn vibrate(&mut self) {
        trace!("no haptic capability on this platform");
    }
}

/// Cue sink that does nothing. Used for headless operation.
#[derive(Debug, Default)]
pub struct NullCues;

impl CueSink for NullCues {
    fn beep(&mut self) {}

    fn vibrate(&mut self) {}
}

/// Cue sink that counts invocations. Test helper.
#[derive(Debug, Default)]
pub struct RecordingCues {
    /// Number of `beep` calls observed.
    pub beeps: usize,
    /// Number of `vibrate` calls observed.
    pub vibrations: usize,
}

impl CueSink for RecordingCues {
    fn beep(&mut self) {
        self.beeps += 1;
    }

    fn vibrate(&mut self) {
        self.vibrations += 1;
    }
}
