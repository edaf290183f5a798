use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::task::{Task, TaskPriority, TaskStatus};
use crate::model::view::{PriorityFilter, SortKey};

/// The three board columns, in display order.
///
/// Borrows from the collection it was projected from; recomputed on every
/// call, never cached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView<'a> {
    pub todo: Vec<&'a Task>,
    pub in_progress: Vec<&'a Task>,
    pub done: Vec<&'a Task>,
}

impl<'a> BoardView<'a> {
    /// The column a status maps to.
    pub fn bucket(&self, status: TaskStatus) -> &[&'a Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    /// Total number of tasks across all columns.
    pub fn card_count(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }
}

/// Project the collection into a board view: filter by priority, partition
/// by status, sort each column independently.
pub fn project_board<'a>(
    tasks: &[&'a Task],
    filter: PriorityFilter,
    sort: SortKey,
) -> BoardView<'a> {
    let mut view = BoardView {
        todo: Vec::new(),
        in_progress: Vec::new(),
        done: Vec::new(),
    };

    for &task in tasks {
        if !filter.matches(task.priority) {
            continue;
        }
        match task.status {
            TaskStatus::Todo => view.todo.push(task),
            TaskStatus::InProgress => view.in_progress.push(task),
            TaskStatus::Done => view.done.push(task),
        }
    }

    sort_column(&mut view.todo, sort);
    sort_column(&mut view.in_progress, sort);
    sort_column(&mut view.done, sort);
    view
}

/// Per-status and per-priority counts over the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub overdue: usize,
}

impl BoardStats {
    /// Count tasks by status, priority, and overdue state.
    pub fn collect(tasks: &[&Task], today: NaiveDate) -> BoardStats {
        let mut stats = BoardStats {
            total: tasks.len(),
            todo: 0,
            in_progress: 0,
            done: 0,
            low: 0,
            medium: 0,
            high: 0,
            overdue: 0,
        };
        for task in tasks {
            match task.status {
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Done => stats.done += 1,
            }
            match task.priority {
                TaskPriority::Low => stats.low += 1,
                TaskPriority::Medium => stats.medium += 1,
                TaskPriority::High => stats.high += 1,
            }
            if task.is_overdue(today) {
                stats.overdue += 1;
            }
        }
        stats
    }
}

/// Sort one column in place. Stable, so equal keys keep insertion order.
fn sort_column(column: &mut [&Task], sort: SortKey) {
    match sort {
        // High before medium before low
        SortKey::Priority => column.sort_by(|a, b| b.priority.cmp(&a.priority)),
        // Dated tasks ascending, undated tasks after all dated ones
        SortKey::DueDate => column.sort_by(|a, b| match (a.due_date, b.due_date) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => x.cmp(&y),
        }),
        // Most recently created first
        SortKey::Created => column.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}
