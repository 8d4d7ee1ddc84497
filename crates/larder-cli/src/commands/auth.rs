use std::time::Duration;

use anyhow::Context;
use serde::Serialize;

use crate::callback;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::{AuthCommands, AuthExchangeArgs, AuthLoginArgs, AuthUrlArgs};
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    merchant_id: Option<String>,
    expires_at: Option<String>,
    expired: bool,
}

#[derive(Serialize)]
struct AuthLogoutResponse {
    logged_out: bool,
}

/// Handle `larder auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => handle_login(args, ctx, flags).await,
        AuthCommands::Url(args) => handle_url(args, ctx, flags),
        AuthCommands::Exchange(args) => handle_exchange(args, ctx, flags).await,
        AuthCommands::Refresh => {
            let tokens = ctx.pos_client()?.refresh_access_token().await?;
            output(&status_of(Some(&tokens)), flags.format)
        }
        AuthCommands::Status => {
            let tokens = ctx.pos_client()?.tokens().await;
            output(&status_of(tokens.as_ref()), flags.format)
        }
        AuthCommands::Logout => {
            larder_pos::TokenStore::File(ctx.data_dir().join("tokens.json")).clear()?;
            output(&AuthLogoutResponse { logged_out: true }, flags.format)
        }
    }
}

async fn handle_login(
    args: &AuthLoginArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = ctx.pos_client()?;
    let (bind, path) = callback::loopback_target(&ctx.config.pos.redirect_uri)?;
    let server = tiny_http::Server::http(&bind)
        .map_err(|e| anyhow::anyhow!("failed to listen on {bind}: {e}"))?;

    let request = client.generate_auth_url(ctx.owner_id()?)?;
    eprintln!("Opening browser to: {}", request.url);
    if let Err(error) = open::that(&request.url) {
        eprintln!("Failed to open browser: {error}");
        eprintln!("Open the URL above manually, then return here.");
    }

    let timeout = Duration::from_secs(args.timeout);
    let received =
        tokio::task::spawn_blocking(move || callback::wait_for_callback(&server, &path, timeout))
            .await
            .context("callback listener task failed")??;

    let tokens = client
        .exchange_code_for_tokens(&received.code, &received.state)
        .await?;
    output(&status_of(Some(&tokens)), flags.format)
}

fn handle_url(args: &AuthUrlArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let request = ctx.pos_client()?.generate_auth_url(ctx.owner_id()?)?;
    if args.open
        && let Err(error) = open::that(&request.url)
    {
        tracing::warn!(%error, "failed to open browser");
        eprintln!("Open this URL in your browser:\n  {}", request.url);
    }
    output(&request, flags.format)
}

async fn handle_exchange(
    args: &AuthExchangeArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let tokens = ctx
        .pos_client()?
        .exchange_code_for_tokens(&args.code, &args.state)
        .await?;
    output(&status_of(Some(&tokens)), flags.format)
}

fn status_of(tokens: Option<&larder_pos::TokenSet>) -> AuthStatusResponse {
    AuthStatusResponse {
        authenticated: tokens.is_some(),
        merchant_id: tokens.map(|t| t.merchant_id.clone()),
        expires_at: tokens.and_then(|t| t.expires_at).map(|at| at.to_rfc3339()),
        expired: tokens.is_some_and(larder_pos::TokenSet::is_expired),
    }
}
