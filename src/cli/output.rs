use chrono::NaiveDate;
use serde::Serialize;

use crate::model::task::{Task, TaskPriority, TaskStatus};
use crate::model::view::{PriorityFilter, SortKey};
use crate::ops::projection::{BoardStats, BoardView};
use crate::ops::search::SearchHit;
use crate::util::text::{pad_to_width, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

// Task, BoardView, and BoardStats serialize directly; only search hits need
// a dedicated shape with the task title attached.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHitJson {
    pub task_id: String,
    pub title: String,
    pub field: String,
    pub spans: Vec<[usize; 2]>,
}

pub fn search_hit_to_json(hit: &SearchHit, task: &Task) -> SearchHitJson {
    SearchHitJson {
        task_id: hit.task_id.clone(),
        title: task.title.clone(),
        field: hit.field.label().to_string(),
        spans: hit.spans.iter().map(|r| [r.start, r.end]).collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Column width of one board column, in display cells
const COL_WIDTH: usize = 24;

fn status_char(status: TaskStatus) -> char {
    match status {
        TaskStatus::Todo => ' ',
        TaskStatus::InProgress => '>',
        TaskStatus::Done => 'x',
    }
}

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    let sc = status_char(task.status);
    let pr = format!("{}{}", task.priority.marker(), task.priority.label());
    let due_str = match task.due_date {
        Some(due) => format!("  due {}", due.format("%Y-%m-%d")),
        None => String::new(),
    };
    format!("[{}] {}  {}  {}{}", sc, task.id, task.title, pr, due_str)
}

/// Format detailed task view
pub fn format_task_detail(task: &Task, today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::new();

    let sc = status_char(task.status);
    lines.push(format!("[{}] {}  {}", sc, task.id, task.title));
    lines.push(format!("status: {}", task.status.label()));
    lines.push(format!("priority: {}", task.priority.label()));
    if let Some(due) = task.due_date {
        let overdue = if task.is_overdue(today) { "  (overdue)" } else { "" };
        lines.push(format!("due: {}{}", due.format("%Y-%m-%d"), overdue));
    }
    lines.push(format!(
        "created: {}",
        task.created_at.format("%Y-%m-%d %H:%M")
    ));
    lines.push(format!(
        "updated: {}",
        task.updated_at.format("%Y-%m-%d %H:%M")
    ));

    if let Some(desc) = &task.description {
        lines.push("desc:".to_string());
        for line in desc.lines() {
            lines.push(format!("  {}", line));
        }
    }

    lines
}

/// Render one column as unpadded card lines
fn column_lines(heading: &str, tasks: &[&Task], today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("{} ({})", heading, tasks.len()));
    lines.push("─".repeat(COL_WIDTH));

    if tasks.is_empty() {
        lines.push("No tasks".to_string());
        return lines;
    }

    for (i, task) in tasks.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let title = truncate_to_width(&task.title, COL_WIDTH - 2);
        lines.push(format!("{} {}", task.priority.marker(), title));
        lines.push(truncate_to_width(&format!("  {}", task.id), COL_WIDTH));
        if let Some(due) = task.due_date {
            let bang = if task.is_overdue(today) { " !" } else { "" };
            lines.push(format!("  due {}{}", due.format("%Y-%m-%d"), bang));
        }
    }

    lines
}

/// Render the three-column board as terminal lines
pub fn format_board(name: &str, view: &BoardView, today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("== {} ==", name));
    lines.push(String::new());

    let columns: Vec<Vec<String>> = TaskStatus::all()
        .iter()
        .map(|s| column_lines(s.heading(), view.bucket(*s), today))
        .collect();

    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..height {
        let mut line = String::new();
        for (c, column) in columns.iter().enumerate() {
            let cell = column.get(row).map(String::as_str).unwrap_or("");
            if c + 1 < columns.len() {
                line.push_str(&pad_to_width(cell, COL_WIDTH));
                line.push_str("  ");
            } else {
                line.push_str(cell);
            }
        }
        lines.push(line.trim_end().to_string());
    }

    lines
}

/// Render the stats summary as terminal lines
pub fn format_stats(name: &str, stats: &BoardStats) -> Vec<String> {
    vec![
        format!("== {} ==", name),
        String::new(),
        format!("total: {}", stats.total),
        format!("todo: {}", stats.todo),
        format!("in-progress: {}", stats.in_progress),
        format!("done: {}", stats.done),
        String::new(),
        format!("low: {}", stats.low),
        format!("medium: {}", stats.medium),
        format!("high: {}", stats.high),
        String::new(),
        format!("overdue: {}", stats.overdue),
    ]
}

/// Format a search hit as a one-line summary with the matched field
pub fn format_search_hit(hit: &SearchHit, task: &Task) -> String {
    format!(
        "[{}] {}  {}  ({})",
        status_char(task.status),
        task.id,
        task.title,
        hit.field.label()
    )
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

/// Parse a status word into a status
pub fn parse_task_status(s: &str) -> Result<TaskStatus, String> {
    TaskStatus::from_label(s)
        .ok_or_else(|| format!("unknown status '{}' (expected: todo, in-progress, done)", s))
}

/// Parse a priority word into a priority
pub fn parse_task_priority(s: &str) -> Result<TaskPriority, String> {
    TaskPriority::from_label(s)
        .ok_or_else(|| format!("unknown priority '{}' (expected: low, medium, high)", s))
}

/// Parse a priority filter word (`all` or a priority)
pub fn parse_priority_filter(s: &str) -> Result<PriorityFilter, String> {
    PriorityFilter::from_label(s).ok_or_else(|| {
        format!(
            "unknown priority filter '{}' (expected: all, low, medium, high)",
            s
        )
    })
}

/// Parse a sort word into a sort key
pub fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    SortKey::from_label(s).ok_or_else(|| {
        format!(
            "unknown sort key '{}' (expected: created, due-date, priority)",
            s
        )
    })
}

/// Parse a YYYY-MM-DD date argument
pub fn parse_due_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected: YYYY-MM-DD)", s))
}
