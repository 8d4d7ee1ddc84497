//! Point-of-sale provider configuration (OAuth app, API endpoints, webhooks).

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const SANDBOX_BASE: &str = "https://connect.squareupsandbox.com";
const PRODUCTION_BASE: &str = "https://connect.squareup.com";

fn default_environment() -> String {
    "sandbox".to_string()
}

fn default_api_version() -> String {
    "2024-01-18".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PosConfig {
    /// OAuth application ID.
    #[serde(default)]
    pub client_id: String,

    /// OAuth application secret.
    #[serde(default)]
    pub client_secret: String,

    /// `sandbox` or `production`. Picks the default base URLs.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Override for the OAuth host (authorize and token endpoints).
    #[serde(default)]
    pub oauth_base_url: String,

    /// Override for the REST API root (catalog, inventory, locations, webhooks).
    #[serde(default)]
    pub api_base_url: String,

    /// Redirect URI registered with the OAuth application.
    #[serde(default)]
    pub redirect_uri: String,

    /// Value sent in the provider's API version header on every request.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Webhook subscription signature key.
    #[serde(default)]
    pub webhook_signature_key: String,

    /// Public URL the provider delivers webhook events to.
    #[serde(default)]
    pub webhook_notification_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for PosConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            environment: default_environment(),
            oauth_base_url: String::new(),
            api_base_url: String::new(),
            redirect_uri: String::new(),
            api_version: default_api_version(),
            webhook_signature_key: String::new(),
            webhook_notification_url: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl PosConfig {
    /// Check if the OAuth application credentials are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Check if webhook verification can run.
    #[must_use]
    pub fn webhooks_configured(&self) -> bool {
        !self.webhook_signature_key.is_empty()
    }

    /// OAuth host, without trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown `environment`.
    pub fn oauth_base(&self) -> Result<String, ConfigError> {
        if !self.oauth_base_url.is_empty() {
            return Ok(self.oauth_base_url.trim_end_matches('/').to_string());
        }
        self.environment_base().map(str::to_string)
    }

    /// REST API root, without trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown `environment`.
    pub fn api_base(&self) -> Result<String, ConfigError> {
        if !self.api_base_url.is_empty() {
            return Ok(self.api_base_url.trim_end_matches('/').to_string());
        }
        self.environment_base().map(|base| format!("{base}/v2"))
    }

    fn environment_base(&self) -> Result<&'static str, ConfigError> {
        match self.environment.as_str() {
            "sandbox" => Ok(SANDBOX_BASE),
            "production" => Ok(PRODUCTION_BASE),
            other => Err(ConfigError::InvalidValue {
                field: "pos.environment".into(),
                reason: format!("expected 'sandbox' or 'production', got '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = PosConfig::default();
        assert!(!config.is_configured());
        assert!(!config.webhooks_configured());
        assert_eq!(config.api_version, "2024-01-18");
    }

    #[test]
    fn configured_when_credentials_set() {
        let config = PosConfig {
            client_id: "sandbox-sq0idb-abc".into(),
            client_secret: "sandbox-sq0csb-def".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn base_urls_follow_environment() {
        let mut config = PosConfig::default();
        assert_eq!(config.api_base().unwrap(), "https://connect.squareupsandbox.com/v2");
        assert_eq!(config.oauth_base().unwrap(), "https://connect.squareupsandbox.com");

        config.environment = "production".into();
        assert_eq!(config.api_base().unwrap(), "https://connect.squareup.com/v2");
    }

    #[test]
    fn explicit_base_urls_win() {
        let config = PosConfig {
            api_base_url: "http://127.0.0.1:9000/v2/".into(),
            oauth_base_url: "http://127.0.0.1:9000".into(),
            environment: "nonsense".into(),
            ..Default::default()
        };
        assert_eq!(config.api_base().unwrap(), "http://127.0.0.1:9000/v2");
        assert_eq!(config.oauth_base().unwrap(), "http://127.0.0.1:9000");
    }

    #[test]
    fn unknown_environment_rejected() {
        let config = PosConfig {
            environment: "staging".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.api_base(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
