use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tb", about = concat!("[#] taskboard v", env!("CARGO_PKG_VERSION"), " - your tasks in three columns"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new board in the current directory
    Init(InitArgs),
    /// Add a task
    Add(AddArgs),
    /// Edit task fields
    Edit(EditArgs),
    /// Move a task to a status column
    Move(MoveArgs),
    /// Start a task (shortcut for move <ID> in-progress)
    Start(StartArgs),
    /// Mark a task done (shortcut for move <ID> done)
    Done(DoneArgs),
    /// Permanently delete tasks
    Rm(RmArgs),
    /// List tasks in collection order
    List(ListArgs),
    /// Render the board (default when no command is given)
    Board(BoardArgs),
    /// Show task details
    Show(ShowArgs),
    /// Search tasks by regex
    Search(SearchArgs),
    /// Show task statistics
    Stats,
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Board name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Longer description
    #[arg(long)]
    pub desc: Option<String>,
    /// Starting status (todo, in-progress, done; default: todo)
    #[arg(long)]
    pub status: Option<String>,
    /// Priority (low, medium, high; default: medium)
    #[arg(long)]
    pub priority: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long)]
    pub desc: Option<String>,
    /// Clear the description
    #[arg(long, conflicts_with = "desc")]
    pub no_desc: bool,
    /// New status (todo, in-progress, done)
    #[arg(long)]
    pub status: Option<String>,
    /// New priority (low, medium, high)
    #[arg(long)]
    pub priority: Option<String>,
    /// New due date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub due: Option<String>,
    /// Clear the due date
    #[arg(long, conflicts_with = "due")]
    pub no_due: bool,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Task ID
    pub id: String,
    /// Target status (todo, in-progress, done)
    pub status: String,
}

#[derive(Args)]
pub struct StartArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task IDs to delete
    #[arg(required = true)]
    pub ids: Vec<String>,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (todo, in-progress, done)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by priority (low, medium, high)
    #[arg(long)]
    pub priority: Option<String>,
}

#[derive(Args, Default)]
pub struct BoardArgs {
    /// Priority filter (all, low, medium, high; default: from board.toml)
    #[arg(long)]
    pub priority: Option<String>,
    /// Column sort (created, due-date, priority; default: from board.toml)
    #[arg(long)]
    pub sort: Option<String>,
    /// Save the given filter and sort as the board defaults
    #[arg(long)]
    pub save: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID to show
    pub id: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern to search for
    pub pattern: String,
    /// Limit search to one status column
    #[arg(long)]
    pub status: Option<String>,
}
