use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Self-documenting header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- taskboard recovery log — append-only error recovery data
     This file captures data that taskboard couldn't save normally:
     snapshots that failed to write and corrupt snapshots that were
     quarantined. If a task went missing, check here.
     Safe to delete if empty or stale. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    Parse,
    Write,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Parse => write!(f, "parse"),
            RecoveryCategory::Write => write!(f, "write"),
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Path helper
// ---------------------------------------------------------------------------

/// Return the path to the recovery log file.
pub fn recovery_log_path(board_dir: &Path) -> PathBuf {
    board_dir.join(".recovery.log")
}

// ---------------------------------------------------------------------------
// Atomic file write
// ---------------------------------------------------------------------------

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry formatting
// ---------------------------------------------------------------------------

impl RecoveryEntry {
    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = String::new();

        // Header line
        out.push_str(&format!(
            "## {} — {}: {}\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        ));
        out.push('\n');

        // Key: value fields
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        // Body as fenced code block
        if !self.body.is_empty() {
            out.push('\n');
            out.push_str("```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push('\n');
        out.push_str("---\n");
        out
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append a recovery entry to the log. Errors are swallowed and printed to stderr.
pub fn log_recovery(board_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(board_dir, entry) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

fn log_recovery_inner(board_dir: &Path, entry: RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(board_dir);

    let needs_header = !path.exists() || std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }

    let markdown = entry.to_markdown();
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Log a snapshot that failed to write, preserving its serialized body.
pub fn log_failed_write(board_dir: &Path, target: &Path, error: &str, snapshot_json: &str) {
    log_recovery(
        board_dir,
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Write,
            description: "snapshot write failed".to_string(),
            fields: vec![
                ("Target".to_string(), target.display().to_string()),
                ("Error".to_string(), error.to_string()),
            ],
            body: snapshot_json.to_string(),
        },
    );
}

/// Log a corrupt snapshot that was quarantined before reseeding.
pub fn log_quarantine(board_dir: &Path, quarantined: &Path, error: &str) {
    log_recovery(
        board_dir,
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Parse,
            description: "corrupt snapshot quarantined".to_string(),
            fields: vec![
                ("Quarantined".to_string(), quarantined.display().to_string()),
                ("Error".to_string(), error.to_string()),
            ],
            body: String::new(),
        },
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
