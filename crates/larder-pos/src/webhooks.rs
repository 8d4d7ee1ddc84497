//! Webhook subscription, signature verification and event dispatch.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use larder_core::store::LocalStore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::PosClient;
use crate::error::PosError;
use crate::http::read_json;
use crate::inventory::InventoryCount;
use crate::sync::SyncResult;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the base64 HMAC-SHA256 of the raw body.
pub const SIGNATURE_HEADER: &str = "x-square-hmacsha256-signature";

pub const CATALOG_UPDATED: &str = "catalog.version.updated";
pub const INVENTORY_UPDATED: &str = "inventory.count.updated";

/// Events the subscription asks for.
pub const WEBHOOK_EVENT_TYPES: [&str; 2] = [CATALOG_UPDATED, INVENTORY_UPDATED];

const SUBSCRIPTION_NAME: &str = "Larder catalog sync";

/// Check `signature` (base64) against HMAC-SHA256(`secret`, `body`).
///
/// The comparison is constant-time. An empty secret or a signature that is
/// not valid base64 never verifies.
#[must_use]
pub fn verify_signature(body: &[u8], signature: &str, secret: &str) -> bool {
    if secret.is_empty() {
        return false;
    }
    let Ok(expected) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// A webhook subscription as registered with the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSubscription {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub event_types: Vec<String>,
    #[serde(default)]
    pub notification_url: String,
    /// Only returned on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct SubscribeRequest<'a> {
    name: &'a str,
    event_types: [&'a str; 2],
    notification_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubscribeResponse {
    subscription: WebhookSubscription,
}

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    event_id: Option<String>,
    #[serde(default)]
    merchant_id: Option<String>,
    #[serde(default)]
    data: Option<EventData>,
}

#[derive(Debug, Deserialize)]
struct EventData {
    #[serde(default)]
    object: EventObject,
}

#[derive(Debug, Default, Deserialize)]
struct EventObject {
    #[serde(default)]
    inventory_counts: Vec<InventoryCount>,
}

/// What handling a verified event did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WebhookOutcome {
    /// The catalog changed and a sync run completed.
    CatalogSynced { result: SyncResult },
    /// Counts carried by an inventory event.
    InventoryUpdated { counts: Vec<InventoryCount> },
    /// Event type not handled, or addressed to another merchant.
    Ignored { event_type: String },
}

impl PosClient {
    /// Register for catalog and inventory events at
    /// `pos.webhook_notification_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::NotConfigured`] without a notification URL,
    /// otherwise any HTTP, API or parse error.
    pub async fn subscribe_to_webhooks(&self) -> Result<WebhookSubscription, PosError> {
        if self.webhook_notification_url.is_empty() {
            return Err(PosError::NotConfigured("pos.webhook_notification_url".into()));
        }
        let url = self.api_url("/webhooks/subscriptions");
        let request = SubscribeRequest {
            name: SUBSCRIPTION_NAME,
            event_types: WEBHOOK_EVENT_TYPES,
            notification_url: &self.webhook_notification_url,
        };

        let resp = self
            .send_authorized(|client| client.post(&url).json(&request))
            .await?;
        let body: SubscribeResponse = read_json(resp, "webhook subscription").await?;
        tracing::debug!(id = %body.subscription.id, "webhook subscription created");
        Ok(body.subscription)
    }

    /// Verify a delivery against `pos.webhook_signature_key`.
    #[must_use]
    pub fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> bool {
        verify_signature(body, signature, &self.webhook_signature_key)
    }

    /// Verify, parse and act on one webhook delivery.
    ///
    /// The signature is checked before the body is parsed. A catalog update
    /// runs [`Self::sync_catalog_to_local`] for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::NotConfigured`] without a signature key,
    /// [`PosError::InvalidSignature`] on mismatch, [`PosError::Parse`] for a
    /// malformed body, or any error from the sync run.
    pub async fn process_webhook_event(
        &self,
        store: Arc<dyn LocalStore>,
        owner_id: &str,
        body: &[u8],
        signature: &str,
    ) -> Result<WebhookOutcome, PosError> {
        if self.webhook_signature_key.is_empty() {
            return Err(PosError::NotConfigured("pos.webhook_signature_key".into()));
        }
        if !self.verify_webhook_signature(body, signature) {
            tracing::warn!(bytes = body.len(), "rejected webhook with invalid signature");
            return Err(PosError::InvalidSignature);
        }

        let event: WebhookEvent = serde_json::from_slice(body)
            .map_err(|e| PosError::Parse(format!("webhook event: {e}")))?;
        tracing::debug!(
            event_type = %event.event_type,
            event_id = event.event_id.as_deref().unwrap_or(""),
            "webhook verified"
        );

        if let Some(merchant) = &event.merchant_id
            && let Some(tokens) = self.tokens().await
            && !tokens.merchant_id.is_empty()
            && &tokens.merchant_id != merchant
        {
            tracing::warn!(%merchant, "webhook for another merchant ignored");
            return Ok(WebhookOutcome::Ignored {
                event_type: event.event_type,
            });
        }

        match event.event_type.as_str() {
            CATALOG_UPDATED => {
                let result = self.sync_catalog_to_local(store, owner_id).await?;
                Ok(WebhookOutcome::CatalogSynced { result })
            }
            INVENTORY_UPDATED => {
                let counts = event.data.map(|d| d.object.inventory_counts).unwrap_or_default();
                Ok(WebhookOutcome::InventoryUpdated { counts })
            }
            _ => Ok(WebhookOutcome::Ignored {
                event_type: event.event_type,
            }),
        }
    }
}
