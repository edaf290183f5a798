use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;

use crate::io::recovery::log_quarantine;
use crate::io::snapshot::{quarantine_snapshot, read_snapshot, write_snapshot, SnapshotError};
use crate::model::task::{Task, TaskDraft, TaskPriority, TaskStatus};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("task not found: {0}")]
    NotFound(String),
}

/// The task collection and its persistence lifecycle.
///
/// Sole mutator of the collection: every mutating call persists the full
/// snapshot before returning. Persistence is best effort; failed writes
/// land in the recovery log.
#[derive(Debug)]
pub struct TaskStore {
    tasks: IndexMap<String, Task>,
    board_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl TaskStore {
    /// Open the store against a board directory.
    ///
    /// Loads `tasks.json` when present. A missing snapshot seeds the starter
    /// fixture and persists it. An unparseable snapshot is quarantined and
    /// logged to the recovery log, then the fixture is seeded in its place.
    pub fn open(board_dir: &Path) -> Result<TaskStore, SnapshotError> {
        match read_snapshot(board_dir) {
            Ok(Some(tasks)) => Ok(TaskStore {
                tasks,
                board_dir: Some(board_dir.to_path_buf()),
            }),
            Ok(None) => {
                let store = TaskStore {
                    tasks: seed_tasks(),
                    board_dir: Some(board_dir.to_path_buf()),
                };
                store.save();
                Ok(store)
            }
            Err(e @ (SnapshotError::ParseError { .. } | SnapshotError::DuplicateId(_))) => {
                let quarantined = quarantine_snapshot(board_dir)?;
                log_quarantine(board_dir, &quarantined, &e.to_string());
                let store = TaskStore {
                    tasks: seed_tasks(),
                    board_dir: Some(board_dir.to_path_buf()),
                };
                store.save();
                Ok(store)
            }
            Err(e) => Err(e),
        }
    }

    /// An empty store with no snapshot path, for tests and embedding.
    pub fn in_memory() -> TaskStore {
        TaskStore {
            tasks: IndexMap::new(),
            board_dir: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

impl TaskStore {
    /// Create a task from a draft. Returns the stored record.
    ///
    /// The new task gets a fresh id and `created_at == updated_at == now`,
    /// and is appended to the end of the collection.
    pub fn create(&mut self, draft: TaskDraft) -> Result<Task, StoreError> {
        if draft.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let now = Utc::now();
        let task = Task {
            id: self.fresh_id(),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(task.id.clone(), task.clone());
        self.save();
        Ok(task)
    }

    /// Replace all mutable fields of a task from a draft.
    ///
    /// `id` and `created_at` are preserved; `updated_at` is refreshed.
    pub fn update(&mut self, id: &str, draft: TaskDraft) -> Result<Task, StoreError> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if draft.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        task.title = draft.title;
        task.description = draft.description;
        task.status = draft.status;
        task.priority = draft.priority;
        task.due_date = draft.due_date;
        task.updated_at = Utc::now();
        let updated = task.clone();
        self.save();
        Ok(updated)
    }

    /// Move a task to a status column.
    ///
    /// The reassignment is unconditional: dropping a task onto the column it
    /// already sits in still refreshes `updated_at`.
    pub fn reassign_status(
        &mut self,
        id: &str,
        new_status: TaskStatus,
    ) -> Result<Task, StoreError> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        task.status = new_status;
        task.updated_at = Utc::now();
        let updated = task.clone();
        self.save();
        Ok(updated)
    }

    /// Remove a task permanently. Returns false (and changes nothing) when
    /// the id is absent; deleting twice is the same as deleting once.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.tasks.shift_remove(id).is_some() {
            self.save();
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

impl TaskStore {
    /// All tasks in insertion order.
    pub fn list(&self) -> Vec<&Task> {
        self.tasks.values().collect()
    }

    /// Look up a single task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl TaskStore {
    /// Millisecond-epoch id, bumped while the value is already taken.
    fn fresh_id(&self) -> String {
        let mut n = Utc::now().timestamp_millis();
        loop {
            let id = n.to_string();
            if !self.tasks.contains_key(&id) {
                return id;
            }
            n += 1;
        }
    }

    /// Persist the collection. Write failures land in the recovery log.
    fn save(&self) {
        if let Some(dir) = &self.board_dir {
            let _ = write_snapshot(dir, &self.tasks);
        }
    }
}

/// Midnight UTC for a known-valid constant date.
fn fixture_time(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

/// The four starter tasks seeded into a fresh board.
fn seed_tasks() -> IndexMap<String, Task> {
    let seeds = [
        Task {
            id: "1".to_string(),
            title: "Design landing page".to_string(),
            description: Some("Create wireframes and mockups for the new landing page".to_string()),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: Some(fixture_time(2026, 1, 15).date_naive()),
            created_at: fixture_time(2026, 1, 5),
            updated_at: fixture_time(2026, 1, 5),
        },
        Task {
            id: "2".to_string(),
            title: "Setup database".to_string(),
            description: Some("Configure PostgreSQL and create initial schema".to_string()),
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            due_date: Some(fixture_time(2026, 1, 10).date_naive()),
            created_at: fixture_time(2026, 1, 5),
            updated_at: fixture_time(2026, 1, 5),
        },
        Task {
            id: "3".to_string(),
            title: "Write documentation".to_string(),
            description: Some("Document the API endpoints and usage examples".to_string()),
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
            created_at: fixture_time(2026, 1, 6),
            updated_at: fixture_time(2026, 1, 6),
        },
        Task {
            id: "4".to_string(),
            title: "Code review".to_string(),
            description: Some("Review pull requests from team members".to_string()),
            status: TaskStatus::Done,
            priority: TaskPriority::Low,
            due_date: None,
            created_at: fixture_time(2026, 1, 4),
            updated_at: fixture_time(2026, 1, 6),
        },
    ];
    seeds.into_iter().map(|t| (t.id.clone(), t)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
