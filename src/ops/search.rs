use std::ops::Range;

use regex::Regex;

use crate::model::task::{Task, TaskStatus};

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Description,
}

impl MatchField {
    pub fn label(self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Description => "description",
        }
    }
}

/// A search hit for a task field
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub task_id: String,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search tasks by title and description, in collection order.
///
/// If `status_filter` is `Some`, only tasks in that column are searched.
pub fn search_tasks(
    tasks: &[&Task],
    re: &Regex,
    status_filter: Option<TaskStatus>,
) -> Vec<SearchHit> {
    let mut hits = Vec::new();

    for task in tasks {
        if let Some(status) = status_filter {
            if task.status != status {
                continue;
            }
        }

        // Title
        let spans = find_matches(re, &task.title);
        if !spans.is_empty() {
            hits.push(SearchHit {
                task_id: task.id.clone(),
                field: MatchField::Title,
                spans,
            });
        }

        // Description
        if let Some(description) = &task.description {
            let spans = find_matches(re, description);
            if !spans.is_empty() {
                hits.push(SearchHit {
                    task_id: task.id.clone(),
                    field: MatchField::Description,
                    spans,
                });
            }
        }
    }

    hits
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
