use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{AuthCommands, TaskCommands, TrashCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create, edit, and browse tasks.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Inspect and empty the trash.
    Trash {
        #[command(subcommand)]
        action: TrashCommands,
    },
    /// Dashboard figures for active tasks.
    Stats(StatsArgs),
    /// Sync with the remote document now.
    Sync,
    /// Manage the sync credential.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Dump the JSON schema of a stored shape.
    Schema(SchemaArgs),
}

impl Commands {
    /// Whether the command can change stored tasks.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        match self {
            Self::Task { action } => !matches!(
                action,
                TaskCommands::Get { .. } | TaskCommands::List { .. }
            ),
            Self::Trash { action } => !matches!(action, TrashCommands::List { .. }),
            Self::Sync => true,
            Self::Stats(_) | Self::Auth { .. } | Self::Schema(_) => false,
        }
    }
}

/// Arguments for `tly stats`.
#[derive(Clone, Debug, Args)]
pub struct StatsArgs {
    /// First creation date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Last creation date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum SchemaKind {
    #[default]
    Task,
    Document,
}

/// Arguments for `tly schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum, default_value = "task")]
    pub kind: SchemaKind,
}
