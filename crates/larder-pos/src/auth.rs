//! OAuth authorization-code flow and token refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PosClient;
use crate::error::PosError;
use crate::http::{VERSION_HEADER, check_response, read_json};
use crate::tokens::TokenSet;

/// Permissions requested on the authorize screen.
const SCOPES: &str = "ITEMS_READ INVENTORY_READ MERCHANT_PROFILE_READ";

/// Where to send the merchant, and the state that must come back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_uri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    merchant_id: Option<String>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

impl TokenResponse {
    /// Merge into a token set, keeping the previous refresh token and
    /// merchant when the provider omits them.
    fn into_tokens(self, previous: Option<&TokenSet>) -> Result<TokenSet, PosError> {
        let refresh_token = self
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| previous.map(|p| p.refresh_token.clone()))
            .ok_or_else(|| PosError::Parse("token response has no refresh_token".into()))?;
        let merchant_id = self
            .merchant_id
            .or_else(|| previous.map(|p| p.merchant_id.clone()))
            .unwrap_or_default();
        Ok(TokenSet {
            access_token: self.access_token,
            refresh_token,
            merchant_id,
            expires_at: self.expires_at,
        })
    }
}

impl PosClient {
    /// Build the authorize URL for `owner_id` and record its state.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::NotConfigured`] without a redirect URI, or a state
    /// store error.
    pub fn generate_auth_url(&self, owner_id: &str) -> Result<AuthorizationRequest, PosError> {
        if self.redirect_uri.is_empty() {
            return Err(PosError::NotConfigured("pos.redirect_uri".into()));
        }
        let state = self.state_store.issue(owner_id)?;
        let url = format!(
            "{}/oauth2/authorize?client_id={}&scope={}&response_type=code&redirect_uri={}&state={}",
            self.oauth_base,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(SCOPES),
            urlencoding::encode(&self.redirect_uri),
            state,
        );
        tracing::debug!(owner_id, "issued OAuth authorize URL");
        Ok(AuthorizationRequest { url, state })
    }

    /// Exchange an authorization code for tokens and store them.
    ///
    /// `state` is validated and consumed first; the provider is never
    /// contacted for an unknown, expired or replayed state.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::InvalidState`] for a bad state, otherwise any
    /// HTTP, API or token store error.
    pub async fn exchange_code_for_tokens(
        &self,
        code: &str,
        state: &str,
    ) -> Result<TokenSet, PosError> {
        let owner_id = self.state_store.consume(state)?;
        let request = TokenRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            grant_type: "authorization_code",
            code: Some(code),
            redirect_uri: Some(&self.redirect_uri),
            refresh_token: None,
        };

        let mut guard = self.tokens.lock().await;
        let tokens = self.request_tokens(&request, None).await?;
        self.token_store.save(&tokens)?;
        *guard = Some(tokens.clone());
        tracing::debug!(
            owner_id,
            merchant_id = %tokens.merchant_id,
            "authorization code exchanged"
        );
        Ok(tokens)
    }

    /// Refresh the access token unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::NotAuthenticated`] when no tokens are held,
    /// otherwise any HTTP, API or token store error.
    pub async fn refresh_access_token(&self) -> Result<TokenSet, PosError> {
        let mut guard = self.tokens.lock().await;
        let current = guard.as_ref().ok_or(PosError::NotAuthenticated)?;
        let refreshed = self.refresh_from(current).await?;
        *guard = Some(refreshed.clone());
        Ok(refreshed)
    }

    /// Refresh after `stale` was rejected, unless another caller already
    /// replaced it. Returns the access token to retry with.
    pub(crate) async fn refresh_after_unauthorized(&self, stale: &str) -> Result<String, PosError> {
        let mut guard = self.tokens.lock().await;
        let current = guard.as_ref().ok_or(PosError::NotAuthenticated)?;
        if current.access_token != stale {
            tracing::debug!("token already refreshed by another request");
            return Ok(current.access_token.clone());
        }
        let refreshed = self.refresh_from(current).await?;
        let access_token = refreshed.access_token.clone();
        *guard = Some(refreshed);
        Ok(access_token)
    }

    async fn refresh_from(&self, current: &TokenSet) -> Result<TokenSet, PosError> {
        let request = TokenRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            grant_type: "refresh_token",
            code: None,
            redirect_uri: None,
            refresh_token: Some(&current.refresh_token),
        };
        let refreshed = self.request_tokens(&request, Some(current)).await?;
        self.token_store.save(&refreshed)?;
        tracing::warn!(merchant_id = %refreshed.merchant_id, "access token refreshed");
        Ok(refreshed)
    }

    async fn request_tokens(
        &self,
        request: &TokenRequest<'_>,
        previous: Option<&TokenSet>,
    ) -> Result<TokenSet, PosError> {
        let resp = self
            .http
            .post(format!("{}/oauth2/token", self.oauth_base))
            .header(VERSION_HEADER, &self.api_version)
            .json(request)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let body: TokenResponse = read_json(resp, "token response").await?;
        body.into_tokens(previous)
    }
}
