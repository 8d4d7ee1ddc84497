use std::fs;
use std::sync::Arc;

use anyhow::Context;
use larder_core::store::LocalStore;
use larder_pos::PosError;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::webhooks::{WebhookCommands, WebhookVerifyArgs};
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct VerifyResponse {
    valid: bool,
}

/// Handle `larder webhooks <subcommand>`.
pub async fn handle(
    action: &WebhookCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        WebhookCommands::Subscribe => {
            let subscription = ctx.pos_client()?.subscribe_to_webhooks().await?;
            output(&subscription, flags.format)
        }
        WebhookCommands::Verify(args) => handle_verify(args, ctx, flags).await,
    }
}

async fn handle_verify(
    args: &WebhookVerifyArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let body = fs::read(&args.body).with_context(|| format!("failed to read {}", args.body))?;
    let client = ctx.pos_client()?;

    if !args.process {
        let valid = client.verify_webhook_signature(&body, &args.signature);
        output(&VerifyResponse { valid }, flags.format)?;
        if !valid {
            anyhow::bail!(PosError::InvalidSignature);
        }
        return Ok(());
    }

    let store: Arc<dyn LocalStore> = ctx.store.clone();
    let outcome = client
        .process_webhook_event(store, ctx.owner_id()?, &body, &args.signature)
        .await?;
    ctx.store.save()?;
    output(&outcome, flags.format)
}
