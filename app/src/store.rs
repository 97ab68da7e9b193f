//! The task store: the single owner of the task collection.
//!
//! [`TaskStore`] holds the in-memory ordered collection, applies mutations,
//! and persists the full collection after every successful mutation. It is
//! the only writer to the persistence adapter.
//!
//! # Change notification
//!
//! There is no ambient reactive cell: mutations bump an explicit
//! [`revision`](TaskStore::revision) counter, and the presentation layer
//! re-renders whenever the revision it last drew is stale. Operations that
//! end up changing nothing (unknown id, empty text, rejected reorder)
//! neither persist nor bump the revision.
//!
//! # Ordering
//!
//! The stored order is display order. The two partitions (active and
//! completed) are order-preserving projections of the master collection;
//! reordering within one partition splices the regrouped view back without
//! perturbing the stored relative order of the other partition.

use tracing::debug;

use crate::storage::Storage;
use crate::types::{now_ms, Group, Millis, Task};

/// In-memory ordered task collection backed by the persistence adapter.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    storage: Storage,
    revision: u64,
}

impl TaskStore {
    /// Loads the collection from storage. Malformed persisted state
    /// degrades to an empty collection (see [`Storage::load_tasks`]).
    #[must_use]
    pub fn load(storage: Storage) -> Self {
        let tasks = storage.load_tasks();
        Self {
            tasks,
            storage,
            revision: 0,
        }
    }

    /// The full collection in stored order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks not yet completed, in stored order.
    #[must_use]
    pub fn active(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.completed).collect()
    }

    /// Completed tasks, in stored order.
    #[must_use]
    pub fn completed(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.completed).collect()
    }

    /// Monotonic change counter; bumped by every effective mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Creates a task and prepends it to the collection (newest-first).
    ///
    /// A no-op if `text` is empty after trimming. Returns the new task's id
    /// when one was created.
    pub fn add(&mut self, text: &str) -> Option<String> {
        let value = text.trim();
        if value.is_empty() {
            return None;
        }

        let task = Task::new(value, now_ms());
        let id = task.id.clone();
        debug!(id = %id, "task added");
        self.tasks.insert(0, task);
        self.persist();
        Some(id)
    }

    /// Flips a task's completion state.
    ///
    /// Completing stamps `completed_at`; un-completing clears it. A silent
    /// no-op if the id is unknown.
    pub fn toggle(&mut self, id: &str) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };

        task.completed = !task.completed;
        task.completed_at = task.completed.then(now_ms);
        debug!(id, completed = task.completed, "task toggled");
        self.persist();
    }

    /// Deletes the task with the given id. A no-op if absent.
    pub fn remove(&mut self, id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() != before {
            debug!(id, "task removed");
            self.persist();
        }
    }

    /// Replaces a task's text.
    ///
    /// A no-op if the trimmed text is empty or the id is unknown.
    pub fn edit(&mut self, id: &str, text: &str) {
        let value = text.trim();
        if value.is_empty() {
            return;
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };

        task.text = value.to_string();
        debug!(id, "task edited");
        self.persist();
    }

    /// Sets or clears a task's due timestamp.
    ///
    /// Always clears `due_notified_at`, so a changed deadline can alert
    /// again. A no-op if the id is unknown.
    pub fn set_due(&mut self, id: &str, due_at: Option<Millis>) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };

        task.due_at = due_at;
        task.due_notified_at = None;
        debug!(id, due_at, "task due date updated");
        self.persist();
    }

    /// Records that a due-alert fired for this task. Idempotent; a no-op if
    /// the id is unknown or the task is already marked.
    pub fn mark_due_notified(&mut self, id: &str, now: Millis) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        if task.due_notified_at.is_some() {
            return;
        }

        task.due_notified_at = Some(now);
        debug!(id, "task marked due-notified");
        self.persist();
    }

    /// Marks several tasks notified in one pass with a single persistence
    /// write. Used by the startup sweep. Unknown or already-marked ids are
    /// skipped.
    pub fn mark_all_due_notified(&mut self, ids: &[String], now: Millis) {
        let mut changed = false;
        for task in &mut self.tasks {
            if ids.iter().any(|id| *id == task.id) && task.due_notified_at.is_none() {
                task.due_notified_at = Some(now);
                changed = true;
            }
        }
        if changed {
            debug!(count = ids.len(), "tasks marked due-notified in bulk");
            self.persist();
        }
    }

    /// Moves `from_id` to the slot currently occupied by `to_id` within one
    /// partition, then splices the regrouped view back into the master
    /// collection, leaving the other partition's stored order untouched.
    ///
    /// A no-op if either id is absent from the target partition's current
    /// view. Cross-partition moves are rejected, not reinterpreted.
    pub fn reorder_in_group(&mut self, group: Group, from_id: &str, to_id: &str) {
        let view: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| group.contains(t))
            .map(|(i, _)| i)
            .collect();

        let from_pos = view.iter().position(|&i| self.tasks[i].id == from_id);
        let to_pos = view.iter().position(|&i| self.tasks[i].id == to_id);
        let (Some(from_pos), Some(to_pos)) = (from_pos, to_pos) else {
            return;
        };
        if from_pos == to_pos {
            return;
        }

        // Reorder the group-local view, then write the tasks back through
        // the same master slots so the other partition is untouched.
        let mut reordered: Vec<Task> = view.iter().map(|&i| self.tasks[i].clone()).collect();
        let moved = reordered.remove(from_pos);
        reordered.insert(to_pos, moved);

        for (&slot, task) in view.iter().zip(reordered) {
            self.tasks[slot] = task;
        }

        debug!(?group, from_id, to_id, "partition reordered");
        self.persist();
    }

    fn persist(&mut self) {
        self.storage.save_tasks(&self.tasks);
        self.revision += 1;
    }
}
