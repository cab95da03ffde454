mod add;
mod delete;
mod done;
mod fields;
mod get;
mod list;
mod restore;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::context::AppContext;

/// Handle `tly task`.
pub async fn handle(
    action: &TaskCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TaskCommands::Add(args) => add::run(args, ctx, flags).await,
        TaskCommands::Update { id, title, fields } => {
            update::run(id, title.as_deref(), fields, ctx, flags).await
        }
        TaskCommands::Get { id } => get::run(id, ctx, flags),
        TaskCommands::List {
            status,
            priority,
            from,
            to,
            search,
            limit,
        } => list::run(
            &list::ListArgs {
                status: status.as_deref(),
                priority: priority.as_deref(),
                from: from.as_deref(),
                to: to.as_deref(),
                search: search.as_deref(),
                limit: *limit,
            },
            ctx,
            flags,
        ),
        TaskCommands::Done { id } => done::run(id, ctx, flags).await,
        TaskCommands::Delete { id } => delete::run(id, ctx, flags).await,
        TaskCommands::Restore { id } => restore::run(id, ctx, flags).await,
    }
}
