use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use indexmap::IndexMap;

use crate::io::recovery::{atomic_write, log_failed_write};
use crate::model::task::Task;

/// Error type for snapshot I/O operations
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("duplicate task id in snapshot: {0}")]
    DuplicateId(String),
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize snapshot: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Return the path to the snapshot file.
pub fn snapshot_path(board_dir: &Path) -> PathBuf {
    board_dir.join("tasks.json")
}

/// Read the task snapshot from the board directory.
///
/// Returns `Ok(None)` if no snapshot file exists yet. The snapshot is a JSON
/// array of tasks; insertion order in the returned map matches array order.
pub fn read_snapshot(board_dir: &Path) -> Result<Option<IndexMap<String, Task>>, SnapshotError> {
    let path = snapshot_path(board_dir);
    if !path.exists() {
        return Ok(None);
    }

    let text = fs::read_to_string(&path).map_err(|e| SnapshotError::ReadError {
        path: path.clone(),
        source: e,
    })?;

    let tasks: Vec<Task> = serde_json::from_str(&text).map_err(|e| SnapshotError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let mut map = IndexMap::with_capacity(tasks.len());
    for task in tasks {
        let id = task.id.clone();
        if map.insert(id.clone(), task).is_some() {
            return Err(SnapshotError::DuplicateId(id));
        }
    }
    Ok(Some(map))
}

/// Write the task snapshot to the board directory atomically.
///
/// On write failure the serialized snapshot is appended to the recovery log
/// so no task data is lost.
pub fn write_snapshot(board_dir: &Path, tasks: &IndexMap<String, Task>) -> Result<(), SnapshotError> {
    let path = snapshot_path(board_dir);
    let json = serialize_snapshot(tasks)?;
    if let Err(e) = atomic_write(&path, json.as_bytes()) {
        log_failed_write(board_dir, &path, &e.to_string(), &json);
        return Err(SnapshotError::WriteError { path, source: e });
    }
    Ok(())
}

/// Serialize the task map as a pretty-printed JSON array.
fn serialize_snapshot(tasks: &IndexMap<String, Task>) -> Result<String, SnapshotError> {
    let list: Vec<&Task> = tasks.values().collect();
    let mut json = serde_json::to_string_pretty(&list)?;
    json.push('\n');
    Ok(json)
}

/// Rename an unparseable snapshot aside so a fresh one can be seeded.
///
/// Returns the quarantine path, e.g. `tasks.json.corrupt-20260115T093000Z`.
pub fn quarantine_snapshot(board_dir: &Path) -> io::Result<PathBuf> {
    let path = snapshot_path(board_dir);
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
    let quarantined = board_dir.join(format!("tasks.json.corrupt-{}", stamp));
    fs::rename(&path, &quarantined)?;
    Ok(quarantined)
}
