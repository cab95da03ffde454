use clap::{Args, Subcommand};

/// Task commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Create a task.
    Add(AddArgs),
    /// Change fields of an active task.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: TaskFieldArgs,
    },
    /// Show an active task.
    Get { id: String },
    /// List active tasks, newest first.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// Created on or after (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Created on or before (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Case-insensitive text in title, description, or notes
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Mark a task done.
    Done { id: String },
    /// Move a task to the trash.
    Delete { id: String },
    /// Bring a task back from the trash.
    Restore { id: String },
}

/// Arguments for `tly task add`.
#[derive(Clone, Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    #[command(flatten)]
    pub fields: TaskFieldArgs,
    /// Creation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub created: Option<String>,
}

/// Optional task fields shared by `add` and `update`.
#[derive(Clone, Debug, Default, Args)]
pub struct TaskFieldArgs {
    #[arg(long)]
    pub description: Option<String>,
    /// planned, in_progress, done
    #[arg(long)]
    pub status: Option<String>,
    /// critical, important, minor
    #[arg(long)]
    pub priority: Option<String>,
    /// YYYY-MM-DD, or `none` to clear
    #[arg(long)]
    pub deadline: Option<String>,
    /// Percent (`40`, `40%`) or fraction (`0.4`)
    #[arg(long)]
    pub progress: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl TaskFieldArgs {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.deadline.is_none()
            && self.progress.is_none()
            && self.notes.is_none()
    }
}
