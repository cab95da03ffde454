use anyhow::bail;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Move a task from the trash back to the active list.
pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(task) = ctx.repo.restore_task(id).await else {
        bail!("task {id} is not in the trash");
    };
    output(&task, flags.format)
}
