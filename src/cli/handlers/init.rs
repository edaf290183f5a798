use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;

const BOARD_TOML_TEMPLATE: &str = r##"[board]
name = "{name}"

# --- View Defaults ---
# How `tb board` renders when no flags are given.
# Uncomment and edit, or use: tb board --priority <p> --sort <key> --save
#
# [view]
# priority = "all"        # all, low, medium, high
# sort = "created"        # created, due-date, priority
"##;

/// Infer a board name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + &chars.collect::<String>()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn cmd_init(start: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let board_dir = start.join("board");

    // Check if already initialized
    if board_dir.is_dir() {
        return Err("taskboard already exists in ./board/".into());
    }

    // Infer board name
    let name = args.name.unwrap_or_else(|| {
        start
            .file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .unwrap_or_else(|| "Untitled".to_string())
    });

    fs::create_dir_all(&board_dir)?;

    // Write board.toml; the task snapshot is seeded on first load
    let toml_content = BOARD_TOML_TEMPLATE.replace("{name}", &name);
    fs::write(board_dir.join("board.toml"), toml_content)?;

    println!("Initialized taskboard: {}", name);
    Ok(())
}
