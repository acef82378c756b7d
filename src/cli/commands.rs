use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::model::task::Priority;
use crate::ops::view::{PriorityFilter, StatusFilter};

#[derive(Parser)]
#[command(name = "td", about = concat!("tabdo v", env!("CARGO_PKG_VERSION"), " - tabbed to-do lists"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tabs with task counts
    Tabs,
    /// Tab management
    Tab(TabCmd),
    /// Add a task (to the active tab unless --tab is given)
    Add(AddArgs),
    /// Edit a task; fields not given keep their values
    Edit(EditArgs),
    /// Remove a task
    Rm(TaskIdArg),
    /// Toggle a task between pending and completed
    Toggle(TaskIdArg),
    /// Cycle a task's priority (low → medium → high → low)
    Cycle(TaskIdArg),
    /// List tasks of a tab, filtered
    List(ListArgs),
    /// Show task details
    Show(TaskIdArg),
}

// ---------------------------------------------------------------------------
// Tab args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TabCmd {
    #[command(subcommand)]
    pub action: TabAction,
}

#[derive(Subcommand)]
pub enum TabAction {
    /// Create a new tab
    Add(TabAddArgs),
    /// Remove a tab and all of its tasks
    Rm(TabRefArg),
    /// Make a tab the active one
    Use(TabRefArg),
}

#[derive(Args)]
pub struct TabAddArgs {
    /// Tab name
    pub name: String,
    /// Also make the new tab active
    #[arg(long = "use")]
    pub activate: bool,
}

#[derive(Args)]
pub struct TabRefArg {
    /// Tab ID, unique ID prefix, or exact name
    pub tab: String,
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TaskIdArg {
    /// Task ID or unique ID prefix
    pub id: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task name
    pub name: String,
    /// Tab to add to (ID, ID prefix, or name)
    #[arg(long)]
    pub tab: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub due: Option<NaiveDate>,
    /// Description
    #[arg(long, default_value = "")]
    pub desc: String,
    /// Priority (low, medium, high)
    #[arg(long)]
    pub priority: Option<Priority>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID or unique ID prefix
    pub id: String,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New due date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, conflicts_with = "no_due")]
    pub due: Option<NaiveDate>,
    /// Clear the due date
    #[arg(long)]
    pub no_due: bool,
    /// New description
    #[arg(long)]
    pub desc: Option<String>,
    /// New priority (low, medium, high)
    #[arg(long)]
    pub priority: Option<Priority>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Tab to list (default: active tab)
    #[arg(long)]
    pub tab: Option<String>,
    /// Case-insensitive substring of the task name
    #[arg(long, short, default_value = "")]
    pub search: String,
    /// Priority filter (all, low, medium, high)
    #[arg(long)]
    pub priority: Option<PriorityFilter>,
    /// Status filter (all, completed, pending)
    #[arg(long)]
    pub status: Option<StatusFilter>,
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", s))
}
