use serde::Serialize;
use tally_auth::SessionCredentials;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct LogoutResponse {
    logged_out: bool,
}

pub async fn handle(credentials: &SessionCredentials, flags: &GlobalFlags) -> anyhow::Result<()> {
    credentials.logout().await?;
    output(&LogoutResponse { logged_out: true }, flags.format)
}
