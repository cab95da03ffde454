use anyhow::bail;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskFieldArgs;
use crate::commands::task::fields::patch_from_args;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    title: Option<&str>,
    fields: &TaskFieldArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if title.is_none() && fields.is_empty() {
        bail!("nothing to update: pass at least one of --title, --description, --status, --priority, --deadline, --progress, --notes");
    }
    let patch = patch_from_args(title, fields)?;

    let Some(task) = ctx.repo.patch_task(id, patch).await? else {
        if ctx.repo.get_trashed(id).is_some() {
            bail!("task {id} is in the trash; restore it before editing");
        }
        bail!("task {id} not found");
    };
    output(&task, flags.format)
}
