use tally_core::entities::TaskDraft;
use tally_core::enums::{Priority, TaskStatus};
use tally_core::progress::Progress;
use tally_core::updates::{TaskPatch, TaskPatchBuilder};

use crate::cli::subcommands::{AddArgs, TaskFieldArgs};
use crate::commands::shared::date::{parse_date, parse_deadline};
use crate::commands::shared::parse::parse_enum;

/// Build a creation draft from `tly task add` arguments.
pub fn draft_from_args(args: &AddArgs) -> anyhow::Result<TaskDraft> {
    let mut draft = TaskDraft::new(args.title.as_str());
    let fields = &args.fields;

    if let Some(description) = &fields.description {
        draft.description.clone_from(description);
    }
    if let Some(status) = &fields.status {
        draft.status = parse_enum::<TaskStatus>(status, "status")?;
    }
    if let Some(priority) = &fields.priority {
        draft.priority = parse_enum::<Priority>(priority, "priority")?;
    }
    if let Some(deadline) = &fields.deadline {
        draft.deadline = parse_deadline(deadline)?;
    }
    if let Some(progress) = &fields.progress {
        draft.progress = Progress::parse(progress)?;
    }
    if let Some(notes) = &fields.notes {
        draft.notes.clone_from(notes);
    }
    if let Some(created) = &args.created {
        draft.created_date = Some(parse_date(created, "created date")?);
    }
    Ok(draft)
}

/// Build a partial update from `tly task update` arguments.
pub fn patch_from_args(title: Option<&str>, fields: &TaskFieldArgs) -> anyhow::Result<TaskPatch> {
    let mut builder = TaskPatchBuilder::new();

    if let Some(title) = title {
        builder = builder.title(title);
    }
    if let Some(description) = &fields.description {
        builder = builder.description(description.as_str());
    }
    if let Some(status) = &fields.status {
        builder = builder.status(parse_enum(status, "status")?);
    }
    if let Some(priority) = &fields.priority {
        builder = builder.priority(parse_enum(priority, "priority")?);
    }
    if let Some(deadline) = &fields.deadline {
        builder = builder.deadline(parse_deadline(deadline)?);
    }
    if let Some(progress) = &fields.progress {
        builder = builder.progress(Progress::parse(progress)?);
    }
    if let Some(notes) = &fields.notes {
        builder = builder.notes(notes.as_str());
    }
    Ok(builder.build())
}
