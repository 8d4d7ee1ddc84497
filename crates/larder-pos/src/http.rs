//! Response classification shared by every provider call.

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;

use crate::error::PosError;

/// Header carrying the provider API version on every request.
pub const VERSION_HEADER: &str = "Square-Version";

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Error envelope returned by the provider on 4xx/5xx.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    code: String,
    #[serde(default)]
    detail: Option<String>,
}

/// Pass successful responses through and turn the rest into errors.
///
/// 429 becomes [`PosError::RateLimited`] (using `Retry-After`, default 60 s).
/// Any other failure becomes [`PosError::Api`], with the provider's error
/// codes as the message when the body is its error envelope. 401 has
/// already been handled by the caller.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, PosError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(PosError::RateLimited {
            retry_after_secs: retry_after_secs(resp.headers()),
        });
    }

    let body = resp.text().await.unwrap_or_default();
    Err(PosError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// `CODE: detail; CODE: detail` from an error envelope, else the raw body.
fn error_message(body: &str) -> String {
    let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) else {
        return body.to_string();
    };
    if envelope.errors.is_empty() {
        return body.to_string();
    }
    envelope
        .errors
        .iter()
        .map(|e| match &e.detail {
            Some(detail) => format!("{}: {detail}", e.code),
            None => e.code.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Decode a JSON body, naming what was being read on failure.
pub async fn read_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
    what: &str,
) -> Result<T, PosError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| PosError::Parse(format!("{what}: {e}")))
}
