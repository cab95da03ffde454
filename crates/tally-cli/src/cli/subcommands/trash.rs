use clap::Subcommand;

/// Trash commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TrashCommands {
    /// List trashed tasks, most recently trashed first.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete one trashed task for good.
    Purge { id: String },
    /// Delete every trashed task for good.
    Clear,
}
