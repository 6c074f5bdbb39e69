use clap::{Parser, Subcommand};
use tareas_core::models::{Category, Recurrence, TaskId, TaskStatus, UserId};

/// Task manager with recurring tasks and per-date progress
#[derive(Parser, Debug)]
#[command(name = "tareas", author, version, about, long_about = None)]
pub struct Cli {
    /// Act as this user instead of the configured default
    #[arg(long, global = true)]
    pub user: Option<UserId>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the JSON HTTP API
    Serve(ServeCommand),
    /// Add a new task
    Add(AddCommand),
    /// List active tasks with their next occurrence
    List,
    /// Delete a task
    Delete(DeleteCommand),
    /// Show the occurrences of one day
    Day(DayCommand),
    /// Show the occurrences between two dates
    Range(RangeCommand),
    /// Show what is still to do today
    Today,
    /// Show recurring occurrences and plain tasks due between two dates
    Calendar(RangeCommand),
    /// Set the state of one occurrence
    Set(SetCommand),
    /// Show per-state task counts
    Stats,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeCommand {
    /// Address to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,
    /// Port to bind (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    /// The description of the task
    #[arg(short, long)]
    pub description: Option<String>,
    /// work, study or personal
    #[arg(short, long, default_value = "personal")]
    pub category: Category,
    /// Due date, or the first date of a recurring task (e.g. 2024-05-01, tomorrow)
    #[arg(long)]
    pub due: Option<String>,
    /// Repeat daily, weekly, monthly or custom
    #[arg(long)]
    pub every: Option<Recurrence>,
    /// Step between occurrences, in units of the recurrence
    #[arg(long, default_value_t = 1)]
    pub interval: i64,
    /// Last date a recurring task may occur on
    #[arg(long, requires = "every")]
    pub until: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the task to delete
    pub id: TaskId,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DayCommand {
    /// The day to show, defaults to today
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct RangeCommand {
    /// First day of the window
    pub from: String,
    /// Last day of the window
    pub to: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SetCommand {
    /// The ID of the task
    pub id: TaskId,
    /// The occurrence date
    pub date: String,
    /// pending, in_progress or completed
    pub state: TaskStatus,
    /// Notes to keep with the occurrence
    #[arg(short, long)]
    pub notes: Option<String>,
}
