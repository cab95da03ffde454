use tally_auth::SessionCredentials;

use crate::cli::GlobalFlags;
use crate::output::output;

pub fn handle(credentials: &SessionCredentials, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&credentials.status(), flags.format)
}
