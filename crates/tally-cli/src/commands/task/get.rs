use anyhow::bail;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match ctx.repo.get_task(id) {
        Some(task) => output(&task, flags.format),
        None if ctx.repo.get_trashed(id).is_some() => {
            bail!("task {id} is in the trash (see 'tly trash list')")
        }
        None => bail!("task {id} not found"),
    }
}
