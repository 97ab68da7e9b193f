//! Terminal user interface for Taskdeck.
//!
//! Built with [`ratatui`] over crossterm. The module follows a simple
//! model-view split:
//!
//! - [`app`]: Application state, input handling, and the async event loop
//! - [`ui`]: Frame rendering and layout composition
//! - [`terminal`]: Terminal initialization and cleanup with panic handling
//!
//! # Usage
//!
//! ```ignore
//! use taskdeck::tui::{install_panic_hook, App, Tui};
//!
//! install_panic_hook();
//! let mut tui = Tui::new()?;
//! app.run(&mut tui).await?;
//! tui.restore()?;
//! ```

pub mod app;
pub mod terminal;
pub mod ui;

pub use app::{App, Mode, TuiEvent};
pub use terminal::{install_panic_hook, Tui};
