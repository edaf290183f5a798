use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Board column a task sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// The word used in snapshots and on the command line
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    /// Parse a status word into a status
    pub fn from_label(s: &str) -> Option<TaskStatus> {
        match s {
            "todo" => Some(TaskStatus::Todo),
            "in-progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    /// Column heading on the rendered board
    pub fn heading(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    /// All statuses in board column order
    pub fn all() -> [TaskStatus; 3] {
        [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done]
    }
}

/// Task priority level, ordered so that `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// The word used in snapshots and on the command line
    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    /// Parse a priority word into a priority
    pub fn from_label(s: &str) -> Option<TaskPriority> {
        match s {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }

    /// Single-character marker used on board cards
    pub fn marker(self) -> char {
        match self {
            TaskPriority::Low => '.',
            TaskPriority::Medium => '-',
            TaskPriority::High => '^',
        }
    }
}

/// A task record as it lives in the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique ID assigned at creation, immutable afterwards
    pub id: String,
    /// Title text (never empty)
    pub title: String,
    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Which column the task sits in
    pub status: TaskStatus,
    /// Priority level
    pub priority: TaskPriority,
    /// Optional due date (calendar date, no time of day)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Refreshed by every mutation
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// True when the due date has passed and the task is not done
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && self.status != TaskStatus::Done,
            None => false,
        }
    }
}

/// Caller-supplied fields for creating or replacing a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// A draft with the given title and the entry-form defaults elsewhere
    pub fn new(title: String) -> Self {
        TaskDraft {
            title,
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
        }
    }
}
