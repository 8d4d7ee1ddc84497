//! Point-of-sale client error types.

use thiserror::Error;

/// Errors from the provider client, its token/state stores and sync runs.
#[derive(Debug, Error)]
pub enum PosError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The provider returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The request was still rejected after one token refresh and retry.
    #[error("access token rejected after refresh; run `larder auth url` to re-authorize")]
    Unauthorized,

    /// No tokens are stored.
    #[error("not authenticated; run `larder auth url` then `larder auth exchange`")]
    NotAuthenticated,

    /// OAuth callback state is unknown, expired or already used.
    #[error("invalid OAuth state: {0}")]
    InvalidState(String),

    /// Webhook body does not match its signature.
    #[error("webhook signature verification failed")]
    InvalidSignature,

    /// Failed to parse a provider response or webhook body.
    #[error("parse error: {0}")]
    Parse(String),

    /// A required configuration value is missing.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// The OS random source failed while generating a nonce.
    #[error("random source unavailable: {0}")]
    Entropy(String),

    /// Token or state persistence failed.
    #[error("token store error: {0}")]
    TokenStore(String),

    /// Local reconciliation could not start.
    #[error(transparent)]
    Sync(#[from] larder_sync::SyncError),

    #[error(transparent)]
    Config(#[from] larder_config::ConfigError),
}
