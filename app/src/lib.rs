//! Taskdeck - a terminal to-do list.
//!
//! This crate implements a small task manager for the terminal: tasks are
//! added, edited, completed, reordered, and scheduled with due dates, and
//! everything persists to a per-user data directory between runs.
//!
//! # Overview
//!
//! State lives in a [`store::TaskStore`] backed by a file-per-key
//! [`storage::Storage`]. A [`notifier::Notifier`] scans for tasks whose due
//! date has passed and raises transient toast reminders, optionally backed
//! by audible and haptic cues through a [`cues::CueSink`]. The [`tui`]
//! module renders it all with ratatui and drives the event loop.
//!
//! # Persistence
//!
//! Writes are best-effort: a failed write logs a warning and the session
//! continues with in-memory state. Malformed persisted data resets to the
//! default rather than failing startup.
//!
//! # Modules
//!
//! - [`types`]: Core data types (tasks, toasts, timestamps)
//! - [`storage`]: File-backed key-value persistence
//! - [`store`]: The task collection and its mutations
//! - [`settings`]: Persisted user toggles
//! - [`notifier`]: Due-date scanning and toast lifecycle
//! - [`cues`]: Audible and haptic cue backends
//! - [`config`]: Configuration from environment variables
//! - [`error`]: Error types for application operations
//! - [`tui`]: Terminal user interface

pub mod config;
pub mod cues;
pub mod error;
pub mod notifier;
pub mod settings;
pub mod storage;
pub mod store;
pub mod tui;
pub mod types;

pub use config::{Config, ConfigError};
pub use cues::{CueSink, NullCues, TerminalCues};
pub use error::{AppError, Result, TuiError};
pub use notifier::{Notifier, DEFAULT_TICK_SECS, TOAST_TTL_MS};
pub use settings::Settings;
pub use storage::{Storage, TASKS_KEY};
pub use store::TaskStore;
pub use types::{now_ms, Group, Millis, Task, Toast};
