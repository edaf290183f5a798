use serde::{Deserialize, Serialize};

use crate::model::task::TaskPriority;

/// Priority filter applied before the board is partitioned into columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFilter {
    All,
    Low,
    Medium,
    High,
}

impl PriorityFilter {
    /// The word used in board.toml and on the command line
    pub fn label(self) -> &'static str {
        match self {
            PriorityFilter::All => "all",
            PriorityFilter::Low => "low",
            PriorityFilter::Medium => "medium",
            PriorityFilter::High => "high",
        }
    }

    /// Parse a filter word into a filter
    pub fn from_label(s: &str) -> Option<PriorityFilter> {
        match s {
            "all" => Some(PriorityFilter::All),
            "low" => Some(PriorityFilter::Low),
            "medium" => Some(PriorityFilter::Medium),
            "high" => Some(PriorityFilter::High),
            _ => None,
        }
    }

    /// True when a task of the given priority passes the filter
    pub fn matches(self, priority: TaskPriority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Low => priority == TaskPriority::Low,
            PriorityFilter::Medium => priority == TaskPriority::Medium,
            PriorityFilter::High => priority == TaskPriority::High,
        }
    }
}

impl Default for PriorityFilter {
    fn default() -> Self {
        PriorityFilter::All
    }
}

/// Per-column sort order for the board view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    Created,
    DueDate,
    Priority,
}

impl SortKey {
    /// The word used in board.toml and on the command line
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Created => "created",
            SortKey::DueDate => "due-date",
            SortKey::Priority => "priority",
        }
    }

    /// Parse a sort word into a sort key
    pub fn from_label(s: &str) -> Option<SortKey> {
        match s {
            "created" => Some(SortKey::Created),
            "due-date" => Some(SortKey::DueDate),
            "priority" => Some(SortKey::Priority),
            _ => None,
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Created
    }
}
