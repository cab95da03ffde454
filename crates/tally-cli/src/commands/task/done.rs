use anyhow::bail;
use tally_core::enums::TaskStatus;
use tally_core::progress::Progress;
use tally_core::updates::TaskPatchBuilder;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Mark a task done and complete its progress.
pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let patch = TaskPatchBuilder::new()
        .status(TaskStatus::Done)
        .progress(Progress::COMPLETE)
        .build();
    let Some(task) = ctx.repo.patch_task(id, patch).await? else {
        bail!("task {id} not found");
    };
    output(&task, flags.format)
}
