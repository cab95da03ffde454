mod login;
mod logout;
mod status;

use tally_auth::SessionCredentials;
use tally_config::TallyConfig;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::context::open_persistence;

/// Handle `tly auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    flags: &GlobalFlags,
    config: &TallyConfig,
) -> anyhow::Result<()> {
    let credentials = load_credentials(config).await?;
    match action {
        AuthCommands::Login(args) => login::handle(args, &credentials, flags).await,
        AuthCommands::Logout => logout::handle(&credentials, flags).await,
        AuthCommands::Status => status::handle(&credentials, flags),
    }
}

async fn load_credentials(config: &TallyConfig) -> anyhow::Result<SessionCredentials> {
    let persistence = open_persistence(config).await?;
    Ok(SessionCredentials::load(persistence, config.auth.token().map(ToString::to_string)).await)
}
