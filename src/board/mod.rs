//! Sole owner of the task collection: identity, status, and order.
//!
//! Every mutation builds a replacement collection and commits it whole, then
//! fires the change listener synchronously so persistence (or any other
//! observer) always sees a consistent snapshot.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::types::{SortMode, Task, TaskStatus};

/// A position inside one column's *view*: the bucket plus the index within
/// that bucket's filtered sequence.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Slot {
    pub bucket: TaskStatus,
    pub index: usize,
}

impl Slot {
    pub fn new(bucket: TaskStatus, index: usize) -> Self {
        Self { bucket, index }
    }
}

/// A finished drag gesture as reported by the input layer. A `None`
/// destination means the card was released outside every drop target.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DragDrop {
    pub task_id: Uuid,
    pub source: Slot,
    pub destination: Option<Slot>,
}

/// What a reorder/reclassify actually did. `completed` is true exactly when
/// the task transitioned into the Completed bucket, which is the caller's cue
/// to fire the celebration effect once.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct MoveOutcome {
    pub moved: bool,
    pub completed: bool,
}

type ChangeListener = Box<dyn Fn(&[Task]) + Send>;

pub struct Board {
    tasks: Vec<Task>,
    sort_mode: SortMode,
    last_created_at: i64,
    on_change: Option<ChangeListener>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self::from_tasks(Vec::new())
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let last_created_at = tasks.iter().map(|t| t.created_at).max().unwrap_or(0);
        Self {
            tasks,
            sort_mode: SortMode::default(),
            last_created_at,
            on_change: None,
        }
    }

    /// Register the observer invoked synchronously after every successful
    /// mutation. Replaces any previous listener.
    pub fn set_change_listener(&mut self, listener: impl Fn(&[Task]) + Send + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Changes how the views are computed. The underlying collection keeps
    /// its manual order untouched.
    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
    }

    /// Adds a task at the front of the collection (newest-first in manual
    /// order). Empty or whitespace-only content is silently ignored.
    pub fn create(&mut self, content: &str) -> Option<Uuid> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let task = Task::new(content, self.next_timestamp());
        let id = task.id;

        let mut next = Vec::with_capacity(self.tasks.len() + 1);
        next.push(task);
        next.extend(self.tasks.iter().cloned());
        self.commit(next);

        debug!(task_id = %id, "task created");
        Some(id)
    }

    /// Inserts a batch of tasks (an AI plan) before all existing tasks,
    /// preserving the batch's relative order. Blank entries are dropped.
    /// Returns how many tasks were actually added.
    pub fn bulk_create(&mut self, contents: &[String]) -> usize {
        let stamp = self.next_timestamp();
        let batch: Vec<Task> = contents
            .iter()
            .map(|content| content.trim())
            .filter(|content| !content.is_empty())
            .map(|content| Task::new(content, stamp))
            .collect();

        if batch.is_empty() {
            return 0;
        }

        let added = batch.len();
        let mut next = batch;
        next.extend(self.tasks.iter().cloned());
        self.commit(next);

        debug!(count = added, "plan batch inserted");
        added
    }

    /// Removes the task with the given id. Unknown ids are a silent no-op,
    /// which also makes deletion idempotent.
    pub fn delete(&mut self, id: Uuid) -> bool {
        if !self.tasks.iter().any(|t| t.id == id) {
            return false;
        }

        let next: Vec<Task> = self.tasks.iter().filter(|t| t.id != id).cloned().collect();
        self.commit(next);
        debug!(task_id = %id, "task deleted");
        true
    }

    /// Drops every task. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.tasks.len();
        if removed > 0 {
            self.commit(Vec::new());
        }
        removed
    }

    /// Applies a finished drag gesture: reorders within a column, or moves
    /// the task across columns updating its status.
    ///
    /// No-ops: missing destination, source equal to destination, unknown
    /// task id, and same-column drops while an automatic sort is active
    /// (reordering is not observable there). The collection size never
    /// changes across this operation.
    pub fn reorder_or_reclassify(&mut self, drop: DragDrop) -> MoveOutcome {
        let Some(dest) = drop.destination else {
            return MoveOutcome::default();
        };
        if drop.source == dest {
            return MoveOutcome::default();
        }
        if self.sort_mode != SortMode::Manual && drop.source.bucket == dest.bucket {
            return MoveOutcome::default();
        }

        if self.sort_mode == SortMode::Manual {
            self.apply_manual_move(drop.task_id, dest)
        } else {
            self.apply_status_flip(drop.task_id, dest.bucket)
        }
    }

    fn apply_manual_move(&mut self, task_id: Uuid, dest: Slot) -> MoveOutcome {
        let Some(position) = self.tasks.iter().position(|t| t.id == task_id) else {
            return MoveOutcome::default();
        };

        let mut next = self.tasks.clone();
        let mut moved = next.remove(position);

        let mut completed = false;
        if moved.status != dest.bucket {
            moved.status = dest.bucket;
            completed = dest.bucket == TaskStatus::Completed;
        }

        // Reinsert so the destination view shows the task at dest.index.
        // Relative order against tasks of the other bucket is unconstrained.
        let bucket_len = next.iter().filter(|t| t.status == dest.bucket).count();
        if dest.index >= bucket_len {
            let mut pending: Vec<Task> = next
                .iter()
                .filter(|t| t.status == TaskStatus::Pending)
                .cloned()
                .collect();
            let mut done: Vec<Task> = next
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .cloned()
                .collect();
            match dest.bucket {
                TaskStatus::Pending => pending.push(moved),
                TaskStatus::Completed => done.push(moved),
            }
            pending.extend(done);
            next = pending;
        } else {
            let anchor_id = next
                .iter()
                .filter(|t| t.status == dest.bucket)
                .nth(dest.index)
                .map(|t| t.id);
            let insert_at = anchor_id
                .and_then(|id| next.iter().position(|t| t.id == id))
                .unwrap_or(next.len());
            next.insert(insert_at, moved);
        }

        self.commit(next);
        debug!(task_id = %task_id, bucket = dest.bucket.as_str(), index = dest.index, "task moved");
        MoveOutcome {
            moved: true,
            completed,
        }
    }

    fn apply_status_flip(&mut self, task_id: Uuid, bucket: TaskStatus) -> MoveOutcome {
        let Some(position) = self.tasks.iter().position(|t| t.id == task_id) else {
            return MoveOutcome::default();
        };
        if self.tasks[position].status == bucket {
            return MoveOutcome::default();
        }

        let mut next = self.tasks.clone();
        next[position].status = bucket;
        self.commit(next);

        debug!(task_id = %task_id, bucket = bucket.as_str(), "task reclassified");
        MoveOutcome {
            moved: true,
            completed: bucket == TaskStatus::Completed,
        }
    }

    /// The ordered sequence a column renders: the collection filtered to one
    /// bucket, re-sorted when an automatic sort mode is active.
    pub fn view(&self, status: TaskStatus) -> Vec<&Task> {
        let mut view: Vec<&Task> = self.tasks.iter().filter(|t| t.status == status).collect();
        match self.sort_mode {
            SortMode::Manual => {}
            SortMode::ByDateDesc => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortMode::Alphabetical => view.sort_by(|a, b| {
                a.content
                    .to_lowercase()
                    .cmp(&b.content.to_lowercase())
                    .then_with(|| a.content.cmp(&b.content))
            }),
        }
        view
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    /// Rounded completed/total percentage; 0 for an empty board.
    pub fn completion_percent(&self) -> u8 {
        let total = self.tasks.len();
        if total == 0 {
            return 0;
        }
        let completed = self.count(TaskStatus::Completed);
        ((completed as f64 / total as f64) * 100.0).round() as u8
    }

    pub fn find(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn commit(&mut self, next: Vec<Task>) {
        self.tasks = next;
        if let Some(listener) = &self.on_change {
            listener(&self.tasks);
        }
    }

    // Creation timestamps are clamped to be non-decreasing within a board so
    // that date-sorted views stay stable across rapid successive creates.
    fn next_timestamp(&mut self) -> i64 {
        let stamp = Utc::now().timestamp_millis().max(self.last_created_at);
        self.last_created_at = stamp;
        stamp
    }
}
