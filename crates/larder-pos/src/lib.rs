//! # larder-pos
//!
//! Client for the point-of-sale provider that owns the remote catalog.
//!
//! - OAuth: authorize URL with single-use `state`, code exchange, refresh
//! - Authenticated reads: locations, catalog (cursor-paginated), inventory
//! - Webhooks: subscription, HMAC-SHA256 verification, event dispatch
//! - [`PosClient::sync_catalog_to_local`]: one full reconciliation run
//!
//! Every authenticated request carries a bearer token and the provider's
//! API version header. A 401 triggers exactly one refresh and one retry.

mod auth;
mod catalog;
pub mod error;
mod http;
mod inventory;
mod locations;
pub mod state;
mod sync;
pub mod tokens;
mod webhooks;

use std::time::Duration;

use larder_config::{LarderConfig, PosConfig, SyncConfig};
use reqwest::StatusCode;
use tokio::sync::Mutex;

pub use auth::AuthorizationRequest;
pub use error::PosError;
pub use http::VERSION_HEADER;
pub use inventory::InventoryCount;
pub use locations::Location;
pub use state::StateStore;
pub use sync::SyncResult;
pub use tokens::{TokenSet, TokenStore};
pub use webhooks::{
    SIGNATURE_HEADER, WEBHOOK_EVENT_TYPES, WebhookOutcome, WebhookSubscription, verify_signature,
};

const TOKENS_FILE_NAME: &str = "tokens.json";
const STATES_FILE_NAME: &str = "oauth_states.json";

/// Authenticated client for one OAuth application.
///
/// Holds the current tokens behind an async mutex so that concurrent
/// callers hitting a 401 share a single refresh.
pub struct PosClient {
    http: reqwest::Client,
    oauth_base: String,
    api_base: String,
    api_version: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    webhook_signature_key: String,
    webhook_notification_url: String,
    location_ids: Vec<String>,
    max_concurrency: usize,
    token_store: TokenStore,
    state_store: StateStore,
    tokens: Mutex<Option<TokenSet>>,
}

impl std::fmt::Debug for PosClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosClient")
            .field("oauth_base", &self.oauth_base)
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .field("client_id", &self.client_id)
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}

impl PosClient {
    /// Build a client and load any stored tokens.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::NotConfigured`] without OAuth credentials,
    /// [`PosError::Config`] for an unknown environment, or
    /// [`PosError::TokenStore`] if stored tokens cannot be read.
    pub fn new(
        pos: &PosConfig,
        sync: &SyncConfig,
        token_store: TokenStore,
        state_store: StateStore,
    ) -> Result<Self, PosError> {
        if !pos.is_configured() {
            return Err(PosError::NotConfigured(
                "pos.client_id and pos.client_secret".into(),
            ));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("larder/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(pos.request_timeout_secs))
            .build()?;
        let tokens = token_store.load()?;

        Ok(Self {
            http,
            oauth_base: pos.oauth_base()?,
            api_base: pos.api_base()?,
            api_version: pos.api_version.clone(),
            client_id: pos.client_id.clone(),
            client_secret: pos.client_secret.clone(),
            redirect_uri: pos.redirect_uri.clone(),
            webhook_signature_key: pos.webhook_signature_key.clone(),
            webhook_notification_url: pos.webhook_notification_url.clone(),
            location_ids: sync.location_ids.clone(),
            max_concurrency: sync.effective_concurrency(),
            token_store,
            state_store,
            tokens: Mutex::new(tokens),
        })
    }

    /// Client with tokens and OAuth states stored under `general.data_dir`.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_config(config: &LarderConfig) -> Result<Self, PosError> {
        let data_dir = config.data_dir();
        Self::new(
            &config.pos,
            &config.sync,
            TokenStore::File(data_dir.join(TOKENS_FILE_NAME)),
            StateStore::file(data_dir.join(STATES_FILE_NAME), config.sync.state_ttl_secs),
        )
    }

    /// Whether tokens are currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.lock().await.is_some()
    }

    /// Copy of the current tokens, if any.
    pub async fn tokens(&self) -> Option<TokenSet> {
        self.tokens.lock().await.clone()
    }

    /// Replace the held tokens, persisting them through the token store.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::TokenStore`] if the tokens cannot be saved.
    pub async fn set_tokens(&self, tokens: TokenSet) -> Result<(), PosError> {
        let mut guard = self.tokens.lock().await;
        self.token_store.save(&tokens)?;
        *guard = Some(tokens);
        Ok(())
    }

    #[must_use]
    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    async fn current_access_token(&self) -> Result<String, PosError> {
        self.tokens
            .lock()
            .await
            .as_ref()
            .map(|t| t.access_token.clone())
            .ok_or(PosError::NotAuthenticated)
    }

    /// Send an authenticated request built by `build`.
    ///
    /// On 401 the tokens are refreshed once (or the token another caller
    /// just refreshed is reused) and the request is rebuilt and sent once
    /// more. A second 401 is [`PosError::Unauthorized`].
    async fn send_authorized<F>(&self, build: F) -> Result<reqwest::Response, PosError>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let token = self.current_access_token().await?;
        let resp = self.send_with_token(&build, &token).await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return http::check_response(resp).await;
        }

        tracing::warn!("access token rejected; refreshing once and retrying");
        let fresh = self.refresh_after_unauthorized(&token).await?;
        let resp = self.send_with_token(&build, &fresh).await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("request still unauthorized after token refresh");
            return Err(PosError::Unauthorized);
        }
        http::check_response(resp).await
    }

    async fn send_with_token<F>(
        &self,
        build: &F,
        token: &str,
    ) -> Result<reqwest::Response, PosError>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        Ok(build(&self.http)
            .bearer_auth(token)
            .header(http::VERSION_HEADER, &self.api_version)
            .send()
            .await?)
    }
}
