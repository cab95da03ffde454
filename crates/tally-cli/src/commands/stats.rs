use tally_core::query::DateRange;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StatsArgs;
use crate::commands::shared::date::parse_optional_date;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tly stats`: dashboard figures over active tasks.
pub fn handle(args: &StatsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let range = DateRange::new(
        parse_optional_date(args.from.as_deref(), "from")?,
        parse_optional_date(args.to.as_deref(), "to")?,
    )?;
    output(&ctx.repo.summary(Some(range)), flags.format)
}
