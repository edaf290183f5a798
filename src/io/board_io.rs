use std::fs;
use std::path::{Path, PathBuf};

use crate::io::snapshot::SnapshotError;
use crate::model::config::BoardConfig;
use crate::model::view::{PriorityFilter, SortKey};
use crate::ops::store::TaskStore;

/// Error type for board discovery and loading
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("not a taskboard: no board/ directory found")]
    NotABoard,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse board.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit board.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("{0}")]
    SnapshotError(#[from] SnapshotError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A discovered board: config plus the opened task store.
#[derive(Debug)]
pub struct Board {
    pub root: PathBuf,
    pub board_dir: PathBuf,
    pub config: BoardConfig,
    pub store: TaskStore,
}

/// Discover the board by walking up from the given directory,
/// looking for a `board/` subdirectory with a `board.toml`.
pub fn discover_board(start: &Path) -> Result<PathBuf, BoardError> {
    let mut current = start.to_path_buf();
    loop {
        let board_dir = current.join("board");
        if board_dir.is_dir() && board_dir.join("board.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(BoardError::NotABoard);
        }
    }
}

/// Load a board from the given root directory: parse the config and open
/// the store against the snapshot.
pub fn load_board(root: &Path) -> Result<Board, BoardError> {
    let board_dir = root.join("board");
    if !board_dir.is_dir() {
        return Err(BoardError::NotABoard);
    }

    let (config, _doc) = read_config(&board_dir)?;
    let store = TaskStore::open(&board_dir)?;

    Ok(Board {
        root: root.to_path_buf(),
        board_dir,
        config,
        store,
    })
}

/// Read the board config, returning both the parsed config and the raw
/// toml_edit Document for round-trip-safe editing.
pub fn read_config(board_dir: &Path) -> Result<(BoardConfig, toml_edit::DocumentMut), BoardError> {
    let config_path = board_dir.join("board.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| BoardError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: BoardConfig = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(board_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), BoardError> {
    let config_path = board_dir.join("board.toml");
    fs::write(&config_path, doc.to_string()).map_err(|e| BoardError::WriteError {
        path: config_path,
        source: e,
    })?;
    Ok(())
}

/// Update the `[view]` defaults in the config document
pub fn set_view_defaults(
    doc: &mut toml_edit::DocumentMut,
    priority: PriorityFilter,
    sort: SortKey,
) {
    if !doc.contains_key("view") {
        doc["view"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["view"]["priority"] = toml_edit::value(priority.label());
    doc["view"]["sort"] = toml_edit::value(sort.label());
}
