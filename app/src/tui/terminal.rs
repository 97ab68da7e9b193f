//! Terminal setup and RAII restoration.
//!
//! [`Tui`] wraps a ratatui terminal: raw mode and the alternate screen are
//! entered on creation and restored on drop, so the shell comes back in a
//! usable state however the application exits. [`install_panic_hook`] covers
//! the remaining gap where a panic fires before the drop handler can run.

use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Installs a panic hook that restores the terminal before the panic
/// message is printed.
///
/// Call once at startup, before creating any [`Tui`]. Restoration is
/// best-effort; the terminal may already be in an inconsistent state when a
/// panic occurs, so errors are ignored and the previous hook runs after.
pub fn install_panic_hook() {
    let previous_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        previous_hook(panic_info);
    }));
}

/// A ratatui terminal with RAII cleanup.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Set once restored, to avoid double cleanup from an explicit
    /// [`restore`](Self::restore) followed by drop.
    restored: bool,
}

impl Tui {
    /// Enters raw mode and the alternate screen, hiding the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if any initialization step fails; partially applied
    /// terminal state is rolled back before returning.
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(t) => t,
            Err(e) => {
                let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
                let _ = disable_raw_mode();
                return Err(e);
            }
        };

        Ok(Self {
            terminal,
            restored: false,
        })
    }

    /// Draws a frame using the provided closure.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }

    /// Explicitly restores the terminal. After this, the [`Tui`] should not
    /// be used for drawing; drop will skip cleanup.
    ///
    /// # Errors
    ///
    /// Unlike the drop handler, restoration errors are propagated.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        execute!(io::stdout(), Show, LeaveAlternateScreen)?;
        disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        // Errors are ignored: we may be unwinding, and a double panic
        // would abort the process.
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
