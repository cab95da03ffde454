use anyhow::bail;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TrashCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ClearTrashResponse {
    removed: usize,
}

/// Handle `tly trash`.
pub async fn handle(
    action: &TrashCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TrashCommands::List { limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            let mut tasks = ctx.repo.trashed_tasks();
            tasks.truncate(usize::try_from(limit)?);
            output(&tasks, flags.format)
        }
        TrashCommands::Purge { id } => {
            let Some(task) = ctx.repo.permanently_delete_task(id).await else {
                if ctx.repo.get_task(id).is_some() {
                    bail!("task {id} is active; delete it before purging");
                }
                bail!("task {id} is not in the trash");
            };
            output(&task, flags.format)
        }
        TrashCommands::Clear => {
            let removed = ctx.repo.clear_trash().await;
            output(&ClearTrashResponse { removed }, flags.format)
        }
    }
}
