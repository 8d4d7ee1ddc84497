//! In-process mock of the provider's HTTP API.

#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use larder_config::{PosConfig, SyncConfig};
use larder_pos::{PosClient, StateStore, TokenSet, TokenStore};

/// One request as the mock saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub authorization: Option<String>,
    pub api_version: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or(&self.url)
    }

    pub fn bearer(&self) -> Option<&str> {
        self.authorization.as_deref()?.strip_prefix("Bearer ")
    }
}

type Handler = dyn Fn(&Recorded) -> (u16, String) + Send + Sync;

pub struct MockProvider {
    server: Arc<tiny_http::Server>,
    base: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    worker: Option<JoinHandle<()>>,
}

impl MockProvider {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
    {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let worker = {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            std::thread::spawn(move || {
                for mut request in server.incoming_requests() {
                    let header = |name: &str| {
                        request
                            .headers()
                            .iter()
                            .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
                            .map(|h| h.value.as_str().to_string())
                    };
                    let authorization = header("Authorization");
                    let api_version = header("Square-Version");
                    let mut body = String::new();
                    let _ = request.as_reader().read_to_string(&mut body);

                    let recorded = Recorded {
                        method: request.method().as_str().to_string(),
                        url: request.url().to_string(),
                        authorization,
                        api_version,
                        body,
                    };
                    let (status, body) = handler(&recorded);
                    requests.lock().unwrap().push(recorded);

                    let response = tiny_http::Response::from_string(body)
                        .with_status_code(status)
                        .with_header(
                            tiny_http::Header::from_bytes(
                                &b"Content-Type"[..],
                                &b"application/json"[..],
                            )
                            .unwrap(),
                        );
                    let _ = request.respond(response);
                }
            })
        };

        Self {
            server,
            base: format!("http://{addr}"),
            requests,
            worker: Some(worker),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path() == path).count()
    }

    pub fn pos_config(&self) -> PosConfig {
        PosConfig {
            client_id: "sq0idp-test-app".into(),
            client_secret: "sq0csp-test-secret".into(),
            oauth_base_url: self.base.clone(),
            api_base_url: format!("{}/v2", self.base),
            redirect_uri: "https://kitchen.example.test/oauth/callback".into(),
            webhook_signature_key: WEBHOOK_KEY.into(),
            webhook_notification_url: "https://kitchen.example.test/webhooks".into(),
            ..PosConfig::default()
        }
    }

    /// Client holding `access_token`, persisting into `token_store`.
    pub async fn client_with(&self, access_token: &str, token_store: TokenStore) -> PosClient {
        let client = PosClient::new(
            &self.pos_config(),
            &SyncConfig::default(),
            token_store,
            StateStore::in_memory(600),
        )
        .unwrap();
        client.set_tokens(tokens(access_token)).await.unwrap();
        client
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

pub const WEBHOOK_KEY: &str = "whsec-integration";

pub fn tokens(access_token: &str) -> TokenSet {
    TokenSet {
        access_token: access_token.into(),
        refresh_token: "refresh-1".into(),
        merchant_id: "MERCHANT_1".into(),
        expires_at: None,
    }
}

pub fn ok(body: serde_json::Value) -> (u16, String) {
    (200, body.to_string())
}

pub fn unauthorized() -> (u16, String) {
    (
        401,
        r#"{"errors":[{"category":"AUTHENTICATION_ERROR","code":"UNAUTHORIZED"}]}"#.into(),
    )
}

pub fn refreshed_token_body() -> (u16, String) {
    ok(serde_json::json!({
        "access_token": "fresh-token",
        "token_type": "bearer",
        "expires_at": "2030-01-01T00:00:00Z",
        "merchant_id": "MERCHANT_1"
    }))
}

pub fn catalog_page() -> serde_json::Value {
    serde_json::json!({
        "objects": [
            {"type": "CATEGORY", "id": "CAT_MAINS", "category_data": {"name": "Mains"}},
            {
                "type": "ITEM",
                "id": "ITEM_CURRY",
                "item_data": {
                    "name": "Green Curry",
                    "description": "Made with coconut milk, curry powder, and vegetables",
                    "category_id": "CAT_MAINS",
                    "variations": [
                        {"type": "ITEM_VARIATION", "id": "VAR_CURRY_L",
                         "item_variation_data": {"name": "Large", "item_id": "ITEM_CURRY"}}
                    ]
                }
            },
            {
                "type": "ITEM",
                "id": "ITEM_SALMON",
                "item_data": {
                    "name": "Salmon Plate",
                    "description": "Grilled salmon with herbs and lemon",
                    "category_id": "CAT_MAINS"
                }
            }
        ]
    })
}
