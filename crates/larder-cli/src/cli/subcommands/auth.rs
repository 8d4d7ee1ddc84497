use clap::{Args, Subcommand};

/// OAuth commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Authorize in the browser and catch the redirect on a loopback
    /// `pos.redirect_uri`.
    Login(AuthLoginArgs),
    /// Print (and optionally open) the provider's authorize URL.
    Url(AuthUrlArgs),
    /// Exchange the code from the OAuth redirect for tokens.
    Exchange(AuthExchangeArgs),
    /// Refresh the stored access token.
    Refresh,
    /// Show whether tokens are stored.
    Status,
    /// Remove stored tokens.
    Logout,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Seconds to wait for the redirect.
    #[arg(long, default_value_t = 120)]
    pub timeout: u64,
}

#[derive(Clone, Debug, Args)]
pub struct AuthUrlArgs {
    /// Open the URL in the default browser.
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Debug, Args)]
pub struct AuthExchangeArgs {
    /// `code` query parameter from the redirect.
    #[arg(long)]
    pub code: String,
    /// `state` query parameter from the redirect.
    #[arg(long)]
    pub state: String,
}
