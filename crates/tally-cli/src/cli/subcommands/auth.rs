use clap::{Args, Subcommand};

/// Sync credential commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Save an access token for sync.
    Login(LoginArgs),
    /// Forget the saved token.
    Logout,
    /// Show where the credential comes from and whether it is usable.
    Status,
}

/// Arguments for `tly auth login`.
#[derive(Clone, Debug, Args)]
pub struct LoginArgs {
    /// OAuth access token for the Drive application-data scope
    #[arg(long)]
    pub token: String,
    /// Seconds until the token expires
    #[arg(long)]
    pub expires_in: Option<i64>,
    /// Account label shown by `tly auth status`
    #[arg(long)]
    pub account: Option<String>,
}
