use schemars::schema_for;
use tally_core::document::RemoteDocument;
use tally_core::entities::Task;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaKind};
use crate::output::output;

/// Handle `tly schema`: print the JSON Schema of a stored shape.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.kind {
        SchemaKind::Task => schema_for!(Task),
        SchemaKind::Document => schema_for!(RemoteDocument),
    };
    output(&schema, flags.format)
}
