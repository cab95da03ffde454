use anyhow::Context;
use serde::Serialize;
use tally_auth::{CredentialSource, Session, SessionCredentials};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::LoginArgs;
use crate::output::output;

#[derive(Serialize)]
struct LoginResponse {
    stored: bool,
    account: Option<String>,
    expires_at: Option<String>,
    note: Option<String>,
}

/// Store an access token as the persisted session.
pub async fn handle(
    args: &LoginArgs,
    credentials: &SessionCredentials,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let expires_in = args.expires_in.map(chrono::Duration::seconds);
    let session = Session::new(args.token.as_str(), expires_in, args.account.clone())?;
    let expires_at = session.expiry().map(|at| at.to_rfc3339());

    credentials
        .login(session)
        .await
        .context("failed to store session")?;

    let status = credentials.status();
    let note = if status.source == CredentialSource::Config {
        Some("a token in config or TALLY_AUTH__TOKEN takes precedence over this session".to_string())
    } else if !status.valid {
        Some("the stored token is already expired".to_string())
    } else {
        None
    };

    output(
        &LoginResponse {
            stored: true,
            account: args.account.clone(),
            expires_at,
            note,
        },
        flags.format,
    )
}
