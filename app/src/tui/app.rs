//! Application state and event loop for the Taskdeck TUI.
//!
//! [`App`] owns the task store, the notification scheduler, and the
//! interaction state (input mode, cursor, grab state). All state changes
//! are driven by [`TuiEvent`] values:
//!
//! - key presses, forwarded from a dedicated input thread
//! - a fast UI tick that drives toast expiry
//! - a slower due-scan tick that drives the notification scheduler
//!
//! The async loop in [`App::run`] multiplexes these with `tokio::select!`.
//! Both timers live inside the loop task, so dropping out of the loop
//! cancels them; no timer can fire against torn-down state.
//!
//! # Reordering
//!
//! Reordering uses a grab/move/drop interaction. Grabbing records the
//! source task id; the cursor then acts as the drop target. Dropping fires
//! a single reorder intent carrying the source id and the id currently
//! under the cursor. Drops outside the source partition (or onto nothing)
//! are rejected rather than reinterpreted, matching the store's
//! cross-partition policy.

use std::time::Duration;

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{Result, TuiError};
use crate::notifier::Notifier;
use crate::settings::Settings;
use crate::storage::Storage;
use crate::store::TaskStore;
use crate::tui::{terminal::Tui, ui};
use crate::types::{now_ms, Group, Millis};

/// Period of the UI tick driving toast expiry and redraws, in milliseconds.
pub const UI_TICK_MS: u64 = 250;

/// How long the input thread waits for terminal events per poll.
const INPUT_POLL_MS: u64 = 100;

/// Capacity of the event channel between input thread and event loop.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Current interaction mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Navigating the lists.
    #[default]
    Normal,
    /// Typing the text of a new task.
    Adding,
    /// Editing the text of an existing task.
    Editing { id: String },
    /// Typing a due offset for an existing task.
    SettingDue { id: String },
    /// Holding a task for reordering; the cursor is the drop target.
    Grabbing { id: String },
}

/// Events that drive the TUI event loop.
#[derive(Debug)]
pub enum TuiEvent {
    /// A key press.
    Key(KeyEvent),
    /// The terminal was resized; the next draw picks up the new size.
    Resize,
}

/// TUI application state.
pub struct App {
    /// The task collection and its mutation API.
    pub store: TaskStore,
    /// Persisted user settings.
    pub settings: Settings,
    /// The notification scheduler and its toast collection.
    pub notifier: Notifier,
    /// Current interaction mode.
    pub mode: Mode,
    /// Selected row in the flattened active-then-completed list.
    pub cursor: usize,
    /// Text being typed in an input mode.
    pub input: String,
    /// Validation message for the current input, if any.
    pub input_error: Option<String>,
    /// Set when the user asks to quit.
    pub should_quit: bool,
    storage: Storage,
    tick_secs: u64,
}

impl App {
    /// Creates the application state.
    #[must_use]
    pub fn new(
        store: TaskStore,
        settings: Settings,
        notifier: Notifier,
        storage: Storage,
        tick_secs: u64,
    ) -> Self {
        Self {
            store,
            settings,
            notifier,
            mode: Mode::default(),
            cursor: 0,
            input: String::new(),
            input_error: None,
            should_quit: false,
            storage,
            tick_secs,
        }
    }

    /// Runs the event loop until the user quits.
    ///
    /// Performs the one-time startup sweep, then alternates draw and event
    /// handling. The due-scan and UI-tick intervals are dropped with the
    /// loop, and the input thread exits once the channel closes.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing to the terminal fails.
    pub async fn run(mut self, tui: &mut Tui) -> Result<()> {
        let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let _input_thread = spawn_input_thread(tx);

        let mut ui_tick = tokio::time::interval(Duration::from_millis(UI_TICK_MS));
        let mut due_scan = tokio::time::interval(Duration::from_secs(self.tick_secs));

        self.notifier
            .sweep(&mut self.store, &self.settings, now_ms());

        while !self.should_quit {
            tui.draw(|frame| ui::render(frame, &self))
                .map_err(TuiError::Render)?;

            tokio::select! {
                maybe_event = rx.recv() => match maybe_event {
                    Some(TuiEvent::Key(key)) => self.handle_key(key),
                    Some(TuiEvent::Resize) => {}
                    None => break,
                },
                _ = ui_tick.tick() => self.notifier.expire(now_ms()),
                _ = due_scan.tick() => {
                    self.notifier.tick(&mut self.store, &self.settings, now_ms());
                }
            }
        }

        Ok(())
    }

    /// Processes one key press according to the current mode.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Raw mode delivers Ctrl+C as a key event rather than a signal.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.mode.clone() {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Grabbing { id } => self.handle_grab_key(key, &id),
            Mode::Adding | Mode::Editing { .. } | Mode::SettingDue { .. } => {
                self.handle_input_key(key);
            }
        }
    }

    /// Ids of all rows in display order: active partition, then completed.
    #[must_use]
    pub fn row_ids(&self) -> Vec<String> {
        self.store
            .active()
            .iter()
            .chain(self.store.completed().iter())
            .map(|t| t.id.clone())
            .collect()
    }

    /// Number of active rows; rows at or past this index are completed.
    #[must_use]
    pub fn active_rows(&self) -> usize {
        self.store.active().len()
    }

    /// Id of the task under the cursor, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<String> {
        self.row_ids().get(self.cursor).cloned()
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.store.toggle(&id);
                    self.clamp_cursor();
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    self.store.remove(&id);
                    self.clamp_cursor();
                }
            }
            KeyCode::Char('a') => {
                self.begin_input(Mode::Adding, String::new());
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    let text = self
                        .store
                        .get(&id)
                        .map(|t| t.text.clone())
                        .unwrap_or_default();
                    self.begin_input(Mode::Editing { id }, text);
                }
            }
            KeyCode::Char('t') => {
                if let Some(id) = self.selected_id() {
                    self.begin_input(Mode::SettingDue { id }, String::new());
                }
            }
            KeyCode::Char('g') => {
                if let Some(id) = self.selected_id() {
                    debug!(id = %id, "task grabbed");
                    self.mode = Mode::Grabbing { id };
                }
            }
            KeyCode::Char('x') => self.notifier.dismiss_newest(),
            KeyCode::Char('n') => self.settings.toggle_notifications(&self.storage),
            KeyCode::Char('s') => self.settings.toggle_sound(&self.storage),
            KeyCode::Char('v') => self.settings.toggle_vibration(&self.storage),
            KeyCode::Char('h') => self.settings.dismiss_hint(&self.storage),
            _ => {}
        }
    }

    fn handle_grab_key(&mut self, key: KeyEvent, source_id: &str) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Char('g') | KeyCode::Enter => self.finish_grab(source_id),
            KeyCode::Esc => self.mode = Mode::Normal,
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input.clear();
                self.input_error = None;
                self.mode = Mode::Normal;
            }
            KeyCode::Enter => self.commit_input(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn begin_input(&mut self, mode: Mode, prefill: String) {
        self.input = prefill;
        self.input_error = None;
        self.mode = mode;
    }

    fn commit_input(&mut self) {
        match self.mode.clone() {
            Mode::Adding => {
                self.store.add(&self.input);
                self.end_input();
            }
            Mode::Editing { id } => {
                self.store.edit(&id, &self.input);
                self.end_input();
            }
            Mode::SettingDue { id } => match parse_due_input(&self.input, now_ms()) {
                Ok(due_at) => {
                    self.store.set_due(&id, due_at);
                    self.end_input();
                }
                Err(message) => self.input_error = Some(message),
            },
            Mode::Normal | Mode::Grabbing { .. } => {}
        }
    }

    fn end_input(&mut self) {
        self.input.clear();
        self.input_error = None;
        self.mode = Mode::Normal;
        self.clamp_cursor();
    }

    /// Completes a grab: a single drop event carrying the source id and the
    /// id under the cursor. Cross-partition drops and drops onto nothing
    /// are rejected.
    fn finish_grab(&mut self, source_id: &str) {
        self.mode = Mode::Normal;

        let Some(target_id) = self.selected_id() else {
            return;
        };
        if target_id == source_id {
            return;
        }

        let from_group = self.group_of(source_id);
        let to_group = self.group_of(&target_id);
        match (from_group, to_group) {
            (Some(from), Some(to)) if from == to => {
                self.store.reorder_in_group(from, source_id, &target_id);
            }
            // Dragging between partitions could auto-toggle completion
            // some day; for now it is rejected.
            _ => debug!(source_id, target_id = %target_id, "cross-partition drop rejected"),
        }
    }

    fn group_of(&self, id: &str) -> Option<Group> {
        self.store.get(id).map(|t| {
            if t.completed {
                Group::Completed
            } else {
                Group::Active
            }
        })
    }

    fn move_cursor(&mut self, delta: isize) {
        let rows = self.store.len();
        if rows == 0 {
            self.cursor = 0;
            return;
        }
        let max = rows - 1;
        self.cursor = self
            .cursor
            .saturating_add_signed(delta)
            .min(max);
    }

    fn clamp_cursor(&mut self) {
        let rows = self.store.len();
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }
}

/// Spawns the blocking input thread.
///
/// Crossterm's event read is blocking, so it lives on its own thread and
/// forwards events over the channel. The thread exits when the receiving
/// side of the channel is dropped, i.e. when the event loop ends.
fn spawn_input_thread(tx: mpsc::Sender<TuiEvent>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(Duration::from_millis(INPUT_POLL_MS)) {
            Ok(true) => {
                let Ok(raw) = event::read() else { break };
                let mapped = match raw {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        Some(TuiEvent::Key(key))
                    }
                    CrosstermEvent::Resize(_, _) => Some(TuiEvent::Resize),
                    _ => None,
                };
                if let Some(ev) = mapped {
                    if tx.blocking_send(ev).is_err() {
                        break;
                    }
                }
            }
            Ok(false) => {}
            Err(_) => break,
        }
    })
}

/// Parses a due-date entry into an absolute timestamp.
///
/// Accepted forms:
///
/// - empty input clears the deadline (`Ok(None)`)
/// - a bare number is minutes from now (`"30"`)
/// - one or more `<number><unit>` terms with units `d`, `h`, `m`, `s`
///   (`"2h30m"`, `"1d"`)
///
/// # Errors
///
/// Returns a human-readable message for anything else; the caller surfaces
/// it next to the input line.
pub fn parse_due_input(input: &str, now: Millis) -> std::result::Result<Option<Millis>, String> {
    let s = input.trim();
    if s.is_empty() {
        return Ok(None);
    }

    if let Ok(minutes) = s.parse::<i64>() {
        if minutes < 0 {
            return Err("due offset cannot be negative".to_string());
        }
        let ms = minutes
            .checked_mul(60_000)
            .and_then(|ms| now.checked_add(ms))
            .ok_or_else(|| "due offset too large".to_string())?;
        return Ok(Some(ms));
    }

    let mut total_ms: Millis = 0;
    let mut digits = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            return Err(format!("expected a number before '{c}'"));
        }
        let n: i64 = digits
            .parse()
            .map_err(|_| format!("'{digits}' is not a valid number"))?;
        digits.clear();

        let unit_ms = match c {
            'd' => 86_400_000,
            'h' => 3_600_000,
            'm' => 60_000,
            's' => 1_000,
            _ => return Err(format!("unknown unit '{c}' (use d, h, m or s)")),
        };
        total_ms = n
            .checked_mul(unit_ms)
            .and_then(|term| total_ms.checked_add(term))
            .ok_or_else(|| "due offset too large".to_string())?;
    }
    if !digits.is_empty() {
        return Err(format!("'{digits}' is missing a unit (use d, h, m or s)"));
    }

    now.checked_add(total_ms)
        .map(Some)
        .ok_or_else(|| "due offset too large".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::NullCues;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::new(dir.path().join("state"));
        let store = TaskStore::load(storage.clone());
        let settings = Settings::load(&storage);
        let notifier = Notifier::new(Box::new(NullCues));
        (dir, App::new(store, settings, notifier, storage, 60))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn add_flow_creates_task() {
        let (_dir, mut app) = test_app();

        app.handle_key(press(KeyCode::Char('a')));
        assert_eq!(app.mode, Mode::Adding);
        type_text(&mut app, "buy milk");
        app.handle_key(press(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.tasks()[0].text, "buy milk");
    }

    #[test]
    fn escape_cancels_input_without_mutation() {
        let (_dir, mut app) = test_app();

        app.handle_key(press(KeyCode::Char('a')));
        type_text(&mut app, "discarded");
        app.handle_key(press(KeyCode::Esc));

        assert_eq!(app.mode, Mode::Normal);
        assert!(app.store.is_empty());
        assert!(app.input.is_empty());
    }

    #[test]
    fn toggle_and_delete_act_on_selection() {
        let (_dir, mut app) = test_app();
        app.store.add("a");
        app.store.add("b");
        // Rows: [b, a]; cursor 0 selects b.

        app.handle_key(press(KeyCode::Char(' ')));
        assert_eq!(app.store.completed().len(), 1);

        // Rows now: [a, b-completed]; delete the active one.
        app.handle_key(press(KeyCode::Char('d')));
        assert_eq!(app.store.len(), 1);
        assert!(app.store.tasks()[0].completed);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let (_dir, mut app) = test_app();
        app.store.add("only");

        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.cursor, 0);

        app.handle_key(press(KeyCode::Up));
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn cursor_clamps_after_deletion() {
        let (_dir, mut app) = test_app();
        app.store.add("a");
        app.store.add("b");
        app.cursor = 1;

        app.handle_key(press(KeyCode::Char('d')));
        assert_eq!(app.cursor, 0);

        app.handle_key(press(KeyCode::Char('d')));
        assert_eq!(app.cursor, 0);
        assert!(app.store.is_empty());
    }

    #[test]
    fn edit_flow_prefills_and_replaces_text() {
        let (_dir, mut app) = test_app();
        app.store.add("befor");

        app.handle_key(press(KeyCode::Char('e')));
        assert_eq!(app.input, "befor");
        type_text(&mut app, "e");
        app.handle_key(press(KeyCode::Enter));

        assert_eq!(app.store.tasks()[0].text, "before");
    }

    #[test]
    fn due_flow_sets_and_clears_deadline() {
        let (_dir, mut app) = test_app();
        app.store.add("a");

        app.handle_key(press(KeyCode::Char('t')));
        type_text(&mut app, "10m");
        app.handle_key(press(KeyCode::Enter));
        assert!(app.store.tasks()[0].due_at.is_some());

        // Empty input clears the deadline.
        app.handle_key(press(KeyCode::Char('t')));
        app.handle_key(press(KeyCode::Enter));
        assert!(app.store.tasks()[0].due_at.is_none());
    }

    #[test]
    fn invalid_due_input_keeps_mode_and_reports_error() {
        let (_dir, mut app) = test_app();
        app.store.add("a");

        app.handle_key(press(KeyCode::Char('t')));
        type_text(&mut app, "next tuesday");
        app.handle_key(press(KeyCode::Enter));

        assert!(matches!(app.mode, Mode::SettingDue { .. }));
        assert!(app.input_error.is_some());
        assert!(app.store.tasks()[0].due_at.is_none());
    }

    #[test]
    fn grab_and_drop_reorders_within_partition() {
        let (_dir, mut app) = test_app();
        app.store.add("a");
        app.store.add("b");
        app.store.add("c");
        // Rows: [c, b, a].

        app.handle_key(press(KeyCode::Char('g')));
        assert!(matches!(app.mode, Mode::Grabbing { .. }));
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Char('g')));

        assert_eq!(app.mode, Mode::Normal);
        let texts: Vec<&str> = app
            .store
            .active()
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts, vec!["b", "a", "c"]);
    }

    #[test]
    fn cross_partition_drop_is_rejected() {
        let (_dir, mut app) = test_app();
        app.store.add("done");
        app.store.add("open");
        // Rows: [open, done]; complete "done".
        app.cursor = 1;
        app.handle_key(press(KeyCode::Char(' ')));
        app.cursor = 0;

        let rev = app.store.revision();
        app.handle_key(press(KeyCode::Char('g')));
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.store.revision(), rev);
    }

    #[test]
    fn escape_cancels_grab() {
        let (_dir, mut app) = test_app();
        app.store.add("a");

        app.handle_key(press(KeyCode::Char('g')));
        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn setting_toggles_persist() {
        let (_dir, mut app) = test_app();

        app.handle_key(press(KeyCode::Char('s')));
        assert!(!app.settings.sound);

        app.handle_key(press(KeyCode::Char('n')));
        assert!(!app.settings.notifications);

        app.handle_key(press(KeyCode::Char('v')));
        assert!(!app.settings.vibration);

        app.handle_key(press(KeyCode::Char('h')));
        assert!(app.settings.hint_dismissed);
    }

    #[test]
    fn quit_key_sets_flag() {
        let (_dir, mut app) = test_app();
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let (_dir, mut app) = test_app();
        app.mode = Mode::Adding;

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn dismiss_key_removes_newest_toast() {
        let (_dir, mut app) = test_app();
        let id = app.store.add("a").expect("created");
        app.store.set_due(&id, Some(10));
        let settings = app.settings.clone();
        app.notifier.tick(&mut app.store, &settings, 20);
        assert_eq!(app.notifier.toasts().len(), 1);

        app.handle_key(press(KeyCode::Char('x')));
        assert!(app.notifier.toasts().is_empty());

        // Dismissing with nothing showing is a no-op.
        app.handle_key(press(KeyCode::Char('x')));
    }

    // parse_due_input

    #[test]
    fn parse_empty_clears() {
        assert_eq!(parse_due_input("", 0), Ok(None));
        assert_eq!(parse_due_input("   ", 0), Ok(None));
    }

    #[test]
    fn parse_bare_number_is_minutes() {
        assert_eq!(parse_due_input("30", 1_000), Ok(Some(1_000 + 30 * 60_000)));
    }

    #[test]
    fn parse_unit_terms_accumulate() {
        assert_eq!(
            parse_due_input("1d2h30m", 0),
            Ok(Some(86_400_000 + 2 * 3_600_000 + 30 * 60_000))
        );
        assert_eq!(parse_due_input("45s", 100), Ok(Some(100 + 45_000)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_due_input("next tuesday", 0).is_err());
        assert!(parse_due_input("h", 0).is_err());
        assert!(parse_due_input("5x", 0).is_err());
        assert!(parse_due_input("5h3", 0).is_err());
        assert!(parse_due_input("-5", 0).is_err());
        assert!(parse_due_input("9999999999999d", 0).is_err());
        assert!(parse_due_input("999999999999999999", 0).is_err());
    }

    #[test]
    fn parse_rejects_overflowing_offsets_without_panicking() {
        // Grammatical but astronomically large entries must degrade to a
        // rejection, never wrap into a bogus past deadline.
        let err = parse_due_input("9999999999999d", 0).expect_err("should reject");
        assert!(err.contains("too large"));

        let err = parse_due_input("999999999999999999", 0).expect_err("should reject");
        assert!(err.contains("too large"));

        // Terms that fit individually but overflow when summed.
        assert!(parse_due_input("9000000000000000s9000000000000000s", 0).is_err());

        // Addition to "now" can overflow even when the offset alone fits.
        assert!(parse_due_input("1s", i64::MAX).is_err());
    }
}
