use crate::cli::GlobalFlags;
use crate::cli::subcommands::AddArgs;
use crate::commands::task::fields::draft_from_args;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(args: &AddArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let draft = draft_from_args(args)?;
    let task = ctx.repo.add_task(draft).await?;
    output(&task, flags.format)
}
