//! Core data types for Taskdeck.
//!
//! This module defines the task record and the ephemeral toast notification
//! record. Tasks serialize to camelCase JSON matching the persisted document
//! format (see the [`storage`](crate::storage) module).
//!
//! # Task lifecycle
//!
//! A task is created incomplete with a fresh id and a creation timestamp.
//! Completing a task stamps `completed_at`; un-completing clears it again.
//! An optional due timestamp drives the notification scheduler: once a
//! deadline elapses and an alert has fired, `due_notified_at` records the
//! fact so the alert never repeats. Changing the due date clears the marker
//! so the new deadline can alert again.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

/// Length of the random alphanumeric suffix in task ids.
const TASK_ID_SUFFIX_LEN: usize = 5;

/// Milliseconds since the Unix epoch, as used throughout the data model.
pub type Millis = i64;

/// Returns the current wall-clock time in milliseconds since the epoch.
#[must_use]
pub fn now_ms() -> Millis {
    Utc::now().timestamp_millis()
}

/// One of the two disjoint, order-preserving partitions of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// Tasks not yet completed.
    Active,
    /// Completed tasks.
    Completed,
}

impl Group {
    /// Returns `true` if the task belongs to this partition.
    #[must_use]
    pub fn contains(self, task: &Task) -> bool {
        match self {
            Group::Active => !task.completed,
            Group::Completed => task.completed,
        }
    }
}

/// A single to-do item.
///
/// Serializes to the persisted document shape: camelCase field names,
/// optional fields omitted when absent.
///
/// # Examples
///
/// ```
/// use taskdeck::types::Task;
///
/// let task = Task::new("water the plants", 1_700_000_000_000);
/// assert!(!task.completed);
/// assert!(task.id.starts_with("1700000000000_"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique identifier, stable for the task's lifetime.
    pub id: String,

    /// The editable label. Non-empty and trimmed by construction.
    pub text: String,

    /// Whether the task has been completed.
    pub completed: bool,

    /// Creation timestamp, fixed for the task's lifetime.
    pub created_at: Millis,

    /// Completion timestamp. Present if and only if `completed` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Millis>,

    /// Optional user-set deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<Millis>,

    /// Set once a due-alert has fired for the current deadline. Older
    /// documents stored this as a boolean flag; both forms are accepted
    /// on read, and it is always written back as a timestamp.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_due_notified"
    )]
    pub due_notified_at: Option<Millis>,
}

impl Task {
    /// Creates a new incomplete task with a fresh id.
    ///
    /// The caller is responsible for rejecting empty text; see
    /// [`TaskStore::add`](crate::store::TaskStore::add).
    #[must_use]
    pub fn new(text: impl Into<String>, created_at: Millis) -> Self {
        Self {
            id: generate_task_id(created_at),
            text: text.into(),
            completed: false,
            created_at,
            completed_at: None,
            due_at: None,
            due_notified_at: None,
        }
    }

    /// Returns `true` if this task's deadline has elapsed without an alert.
    ///
    /// Completed tasks are never due, regardless of their deadline.
    #[must_use]
    pub fn is_due_unnotified(&self, now: Millis) -> bool {
        !self.completed
            && self.due_notified_at.is_none()
            && self.due_at.is_some_and(|due| due <= now)
    }
}

/// An ephemeral in-app notification.
///
/// Toasts are created by the notification scheduler and removed either by
/// explicit dismissal or automatically after a fixed lifetime. The id is
/// derived from the source task id and the trigger timestamp, which keeps
/// render keys stable without requiring global uniqueness across restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Identifier, unique within the current toast collection.
    pub id: String,

    /// Human-readable message.
    pub text: String,

    /// Creation timestamp; expiry is measured from this.
    pub created_at: Millis,
}

impl Toast {
    /// Creates a toast attributed to a source (typically a task id).
    #[must_use]
    pub fn new(source: &str, text: impl Into<String>, created_at: Millis) -> Self {
        Self {
            id: format!("{source}_{created_at}"),
            text: text.into(),
            created_at,
        }
    }
}

/// Generates a task id of the form `<millis>_<5 alphanumeric characters>`.
fn generate_task_id(created_at: Millis) -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::rng();
    let suffix: String = (0..TASK_ID_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();

    format!("{created_at}_{suffix}")
}

/// Accepts the legacy boolean form of `dueNotifiedAt` alongside the
/// timestamp form. `true` maps to timestamp 0, `false` to unset.
fn deserialize_due_notified<'de, D>(deserializer: D) -> Result<Option<Millis>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Timestamp(Millis),
        Flag(bool),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Timestamp(ms)) => Some(ms),
        Some(Raw::Flag(true)) => Some(0),
        Some(Raw::Flag(false)) | None => None,
    })
}
