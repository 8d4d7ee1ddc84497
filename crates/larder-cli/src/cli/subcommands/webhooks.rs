use clap::{Args, Subcommand};

/// Webhook commands.
#[derive(Clone, Debug, Subcommand)]
pub enum WebhookCommands {
    /// Register catalog and inventory event delivery.
    Subscribe,
    /// Verify a delivered body against its signature header value.
    Verify(WebhookVerifyArgs),
}

#[derive(Clone, Debug, Args)]
pub struct WebhookVerifyArgs {
    /// File holding the raw request body, exactly as received.
    pub body: String,
    /// Value of the signature header.
    #[arg(long)]
    pub signature: String,
    /// Handle the event after verifying it.
    #[arg(long)]
    pub process: bool,
}
