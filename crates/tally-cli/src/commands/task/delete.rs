use anyhow::bail;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Move a task to the trash.
pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(task) = ctx.repo.delete_task(id).await else {
        bail!("task {id} not found");
    };
    output(&task, flags.format)
}
