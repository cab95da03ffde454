use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
///
/// A successful write is followed by an immediate sync so the change leaves
/// the machine before the process exits.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let flush_after = command.is_mutating() && !matches!(command, Commands::Sync);

    match command {
        Commands::Task { action } => commands::task::handle(&action, ctx, flags).await?,
        Commands::Trash { action } => commands::trash::handle(&action, ctx, flags).await?,
        Commands::Stats(args) => commands::stats::handle(&args, ctx, flags)?,
        Commands::Sync => commands::sync::handle(ctx, flags).await?,
        Commands::Schema(_) | Commands::Auth { .. } => {
            unreachable!("schema/auth are pre-dispatched in main")
        }
    }

    if flush_after {
        commands::sync::flush_after_write(ctx).await;
    }
    Ok(())
}
