//! Rendering for the Taskdeck TUI.
//!
//! Pure view code: everything here reads [`App`] state and draws, never
//! mutates. The screen is a header, the two task partitions, a status or
//! input line, and two floating layers: the toast stack in the top-right
//! corner and the first-run hint panel until it is dismissed.

use chrono::{Local, TimeZone};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::tui::app::{App, Mode};
use crate::types::{now_ms, Millis, Task};

/// Maximum number of toasts drawn at once; older ones wait underneath.
const MAX_VISIBLE_TOASTS: usize = 4;

/// Width of the floating toast column.
const TOAST_WIDTH: u16 = 36;

/// Renders one frame.
pub fn render(frame: &mut Frame, app: &App) {
    let [header_area, lists_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(4),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    render_header(frame, header_area, app);
    render_lists(frame, lists_area, app);
    render_footer(frame, footer_area, app);

    if !app.settings.hint_dismissed {
        render_hint(frame, frame.area());
    }
    render_toasts(frame, frame.area(), app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let flags = format!(
        " alerts:{} sound:{} vibrate:{}",
        on_off(app.settings.notifications),
        on_off(app.settings.sound),
        on_off(app.settings.vibration),
    );
    let header = Line::from(vec![
        Span::styled(" taskdeck ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(flags, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_lists(frame: &mut Frame, area: Rect, app: &App) {
    let [active_area, completed_area] =
        Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);

    let active = app.store.active();
    let completed = app.store.completed();
    let active_rows = active.len();
    let now = now_ms();

    let grabbed_id = match &app.mode {
        Mode::Grabbing { id } => Some(id.as_str()),
        _ => None,
    };

    render_partition(
        frame,
        active_area,
        " Active ",
        &active,
        selected_in(app.cursor, 0, active_rows),
        grabbed_id,
        now,
    );
    render_partition(
        frame,
        completed_area,
        " Completed ",
        &completed,
        selected_in(app.cursor, active_rows, completed.len()),
        grabbed_id,
        now,
    );
}

/// Maps the flattened cursor onto a partition-local selection.
fn selected_in(cursor: usize, offset: usize, len: usize) -> Option<usize> {
    cursor
        .checked_sub(offset)
        .filter(|local| *local < len)
}

fn render_partition(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    tasks: &[&Task],
    selected: Option<usize>,
    grabbed_id: Option<&str>,
    now: Millis,
) {
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| task_item(task, grabbed_id, now))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Indexed(237)))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn task_item<'a>(task: &'a Task, grabbed_id: Option<&str>, now: Millis) -> ListItem<'a> {
    let checkbox = if task.completed { "[x] " } else { "[ ] " };

    let mut text_style = Style::default();
    if task.completed {
        text_style = text_style
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT);
    }
    if grabbed_id == Some(task.id.as_str()) {
        text_style = text_style.add_modifier(Modifier::ITALIC | Modifier::BOLD);
    }

    let mut spans = vec![
        Span::raw(checkbox),
        Span::styled(task.text.as_str(), text_style),
    ];

    if let Some(due) = task.due_at {
        let overdue = !task.completed && due <= now;
        let style = if overdue {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        spans.push(Span::styled(format!("  due {}", format_due(due)), style));
    }

    ListItem::new(Line::from(spans))
}

/// Formats a due timestamp in local time.
fn format_due(due: Millis) -> String {
    match Local.timestamp_millis_opt(due).single() {
        Some(dt) => dt.format("%m-%d %H:%M").to_string(),
        None => "?".to_string(),
    }
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.mode {
        Mode::Adding => input_line("new task", app),
        Mode::Editing { .. } => input_line("edit", app),
        Mode::SettingDue { .. } => input_line("due in (e.g. 30, 2h30m, empty clears)", app),
        Mode::Grabbing { .. } => Line::from(Span::styled(
            " moving: j/k position, g/Enter drop, Esc cancel",
            Style::default().fg(Color::Cyan),
        )),
        Mode::Normal => Line::from(Span::styled(
            " a add  e edit  t due  Space done  d delete  g move  x close alert  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let mut lines = vec![line];
    if let Some(error) = &app.input_error {
        lines.push(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn input_line<'a>(prompt: &str, app: &'a App) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!(" {prompt}> "),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(app.input.as_str()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ])
}

/// Draws the toast stack in the top-right corner, newest at the top.
fn render_toasts(frame: &mut Frame, area: Rect, app: &App) {
    let width = TOAST_WIDTH.min(area.width);
    if width < 8 || area.height < 4 {
        return;
    }

    for (i, toast) in app
        .notifier
        .toasts()
        .iter()
        .rev()
        .take(MAX_VISIBLE_TOASTS)
        .enumerate()
    {
        let y = 1 + (i as u16) * 3;
        if y + 3 > area.height {
            break;
        }
        let rect = Rect {
            x: area.right().saturating_sub(width + 1),
            y,
            width,
            height: 3,
        };

        let body = Paragraph::new(toast.text.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" reminder (x) "),
            );
        frame.render_widget(Clear, rect);
        frame.render_widget(body, rect);
    }
}

/// Draws the first-run hint panel centered near the bottom.
fn render_hint(frame: &mut Frame, area: Rect) {
    let height: u16 = 8;
    let width: u16 = 48;
    if area.width < width + 2 || area.height < height + 3 {
        return;
    }
    let rect = Rect {
        x: (area.width - width) / 2,
        y: area.height - height - 3,
        width,
        height,
    };

    let lines = vec![
        Line::from("j/k or arrows  move between tasks"),
        Line::from("Space/Enter    complete / reopen"),
        Line::from("a / e / t      add, edit, set due date"),
        Line::from("g              grab to reorder, g again to drop"),
        Line::from("n / s / v      toggle alerts, sound, vibration"),
        Line::from(""),
        Line::from(Span::styled(
            "press h to hide this panel",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title(" Keys "));
    frame.render_widget(Clear, rect);
    frame.render_widget(panel, rect);
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
