use tally_core::enums::{Priority, TaskStatus};
use tally_core::query::{DateRange, TaskFilter};

use crate::cli::GlobalFlags;
use crate::commands::shared::date::parse_optional_date;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub struct ListArgs<'a> {
    pub status: Option<&'a str>,
    pub priority: Option<&'a str>,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub search: Option<&'a str>,
    pub limit: Option<u32>,
}

pub fn run(args: &ListArgs<'_>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = effective_limit(args.limit, flags.limit, ctx.config.general.default_limit);
    let filter = build_filter(args)?;

    let mut tasks = ctx.repo.query(&filter);
    tasks.truncate(usize::try_from(limit)?);

    output(&tasks, flags.format)
}

fn build_filter(args: &ListArgs<'_>) -> anyhow::Result<TaskFilter> {
    Ok(TaskFilter {
        status: args
            .status
            .map(|raw| parse_enum::<TaskStatus>(raw, "status"))
            .transpose()?,
        priority: args
            .priority
            .map(|raw| parse_enum::<Priority>(raw, "priority"))
            .transpose()?,
        range: DateRange::new(
            parse_optional_date(args.from, "from")?,
            parse_optional_date(args.to, "to")?,
        )?,
        search: args.search.map(ToString::to_string),
    })
}
