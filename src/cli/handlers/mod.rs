mod init;
pub use init::cmd_init;

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::board_io::{self, Board};
use crate::io::lock::BoardLock;
use crate::model::task::{Task, TaskDraft, TaskStatus};
use crate::model::view::{PriorityFilter, SortKey};
use crate::ops::projection::{project_board, BoardStats};
use crate::ops::search;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let start = resolve_start_dir(cli.board_dir.as_deref())?;

    match cli.command {
        // Bare `tb` renders the board with the configured defaults
        None => cmd_board(&start, BoardArgs::default(), json),
        Some(cmd) => match cmd {
            // Init runs before any board discovery
            Commands::Init(args) => cmd_init(&start, args),

            // Read commands
            Commands::List(args) => cmd_list(&start, args, json),
            Commands::Board(args) => cmd_board(&start, args, json),
            Commands::Show(args) => cmd_show(&start, args, json),
            Commands::Search(args) => cmd_search(&start, args, json),
            Commands::Stats => cmd_stats(&start, json),

            // Write commands
            Commands::Add(args) => cmd_add(&start, args, json),
            Commands::Edit(args) => cmd_edit(&start, args, json),
            Commands::Move(args) => cmd_move(&start, args, json),
            Commands::Start(args) => cmd_start(&start, args, json),
            Commands::Done(args) => cmd_done(&start, args, json),
            Commands::Rm(args) => cmd_rm(&start, args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the directory discovery starts from: the -C override or the cwd.
fn resolve_start_dir(board_dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match board_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e).into()),
        None => Ok(std::env::current_dir()?),
    }
}

fn open_board(start: &Path) -> Result<Board, Box<dyn std::error::Error>> {
    let root = board_io::discover_board(start)?;
    Ok(board_io::load_board(&root)?)
}

/// Discover the board, take the write lock, then load. Mutating commands
/// hold the lock across load and save so concurrent writers serialize.
fn open_board_locked(start: &Path) -> Result<(Board, BoardLock), Box<dyn std::error::Error>> {
    let root = board_io::discover_board(start)?;
    let lock = BoardLock::acquire_default(&root.join("board"))?;
    let board = board_io::load_board(&root)?;
    Ok((board, lock))
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Resolve view settings: CLI flags override board.toml defaults.
fn view_settings(board: &Board, args: &BoardArgs) -> Result<(PriorityFilter, SortKey), String> {
    let filter = match args.priority.as_deref() {
        Some(word) => parse_priority_filter(word)?,
        None => board.config.view.priority,
    };
    let sort = match args.sort.as_deref() {
        Some(word) => parse_sort_key(word)?,
        None => board.config.view.sort,
    };
    Ok((filter, sort))
}

/// Prompt on stderr and read a y/N answer from stdin.
fn confirm(prompt: &str) -> Result<bool, Box<dyn std::error::Error>> {
    eprint!("{} [y/N] ", prompt);
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(start: &Path, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let board = open_board(start)?;
    let status_filter = args.status.as_deref().map(parse_task_status).transpose()?;
    let priority_filter = args
        .priority
        .as_deref()
        .map(parse_task_priority)
        .transpose()?;

    let filter = |task: &&Task| -> bool {
        if let Some(sf) = status_filter
            && task.status != sf
        {
            return false;
        }
        if let Some(pf) = priority_filter
            && task.priority != pf
        {
            return false;
        }
        true
    };

    let tasks: Vec<&Task> = board.store.list().into_iter().filter(filter).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else {
        for task in &tasks {
            println!("{}", format_task_line(task));
        }
    }
    Ok(())
}

fn cmd_board(start: &Path, args: BoardArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let root = board_io::discover_board(start)?;
    // --save writes back to board.toml, so it takes the write lock
    let _lock = if args.save {
        Some(BoardLock::acquire_default(&root.join("board"))?)
    } else {
        None
    };
    let board = board_io::load_board(&root)?;
    let (filter, sort) = view_settings(&board, &args)?;

    if args.save {
        let (_, mut doc) = board_io::read_config(&board.board_dir)?;
        board_io::set_view_defaults(&mut doc, filter, sort);
        board_io::write_config(&board.board_dir, &doc)?;
    }

    let tasks = board.store.list();
    let view = project_board(&tasks, filter, sort);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        for line in format_board(&board.config.board.name, &view, today()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_show(start: &Path, args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let board = open_board(start)?;
    let task = board
        .store
        .get(&args.id)
        .ok_or_else(|| format!("task not found: {}", args.id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        for line in format_task_detail(task, today()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_search(
    start: &Path,
    args: SearchArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let board = open_board(start)?;
    let re = Regex::new(&args.pattern)?;
    let status_filter = args.status.as_deref().map(parse_task_status).transpose()?;

    let tasks = board.store.list();
    let hits = search::search_tasks(&tasks, &re, status_filter);

    if json {
        let out: Vec<SearchHitJson> = hits
            .iter()
            .filter_map(|hit| {
                board
                    .store
                    .get(&hit.task_id)
                    .map(|task| search_hit_to_json(hit, task))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        // One line per task even when several fields match
        let mut seen = HashSet::new();
        for hit in &hits {
            if seen.insert(&hit.task_id)
                && let Some(task) = board.store.get(&hit.task_id)
            {
                println!("{}", format_search_hit(hit, task));
            }
        }
    }
    Ok(())
}

fn cmd_stats(start: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let board = open_board(start)?;
    let tasks = board.store.list();
    let stats = BoardStats::collect(&tasks, today());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        for line in format_stats(&board.config.board.name, &stats) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(start: &Path, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut board, _lock) = open_board_locked(start)?;

    let mut draft = TaskDraft::new(args.title);
    draft.description = args.desc;
    if let Some(ref word) = args.status {
        draft.status = parse_task_status(word)?;
    }
    if let Some(ref word) = args.priority {
        draft.priority = parse_task_priority(word)?;
    }
    if let Some(ref word) = args.due {
        draft.due_date = Some(parse_due_date(word)?);
    }

    let task = board.store.create(draft)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("{}", format_task_line(&task));
    }
    Ok(())
}

fn cmd_edit(start: &Path, args: EditArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut board, _lock) = open_board_locked(start)?;

    let current = board
        .store
        .get(&args.id)
        .ok_or_else(|| format!("task not found: {}", args.id))?
        .clone();

    // Start from the current record, then apply each given flag
    let mut draft = TaskDraft {
        title: current.title,
        description: current.description,
        status: current.status,
        priority: current.priority,
        due_date: current.due_date,
    };
    if let Some(title) = args.title {
        draft.title = title;
    }
    if args.no_desc {
        draft.description = None;
    } else if let Some(desc) = args.desc {
        draft.description = Some(desc);
    }
    if let Some(ref word) = args.status {
        draft.status = parse_task_status(word)?;
    }
    if let Some(ref word) = args.priority {
        draft.priority = parse_task_priority(word)?;
    }
    if args.no_due {
        draft.due_date = None;
    } else if let Some(ref word) = args.due {
        draft.due_date = Some(parse_due_date(word)?);
    }

    let task = board.store.update(&args.id, draft)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("{}", format_task_line(&task));
    }
    Ok(())
}

fn cmd_move(start: &Path, args: MoveArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let status = parse_task_status(&args.status)?;
    let (mut board, _lock) = open_board_locked(start)?;
    let task = board.store.reassign_status(&args.id, status)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("{} → {}", task.id, task.status.label());
    }
    Ok(())
}

fn cmd_start(start: &Path, args: StartArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut board, _lock) = open_board_locked(start)?;
    let task = board.store.reassign_status(&args.id, TaskStatus::InProgress)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("{} → {}", task.id, task.status.label());
    }
    Ok(())
}

fn cmd_done(start: &Path, args: DoneArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut board, _lock) = open_board_locked(start)?;
    let task = board.store.reassign_status(&args.id, TaskStatus::Done)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("{} → {}", task.id, task.status.label());
    }
    Ok(())
}

fn cmd_rm(start: &Path, args: RmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut board, _lock) = open_board_locked(start)?;

    for id in &args.ids {
        let title = match board.store.get(id) {
            Some(task) => task.title.clone(),
            None => {
                println!("{} not found, nothing deleted", id);
                continue;
            }
        };
        if !args.yes && !confirm(&format!("delete {} \"{}\"?", id, title))? {
            println!("{} skipped", id);
            continue;
        }
        if board.store.delete(id) {
            println!("{} deleted", id);
        }
    }
    Ok(())
}
