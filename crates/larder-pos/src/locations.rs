//! Merchant locations: `GET /locations`.

use serde::{Deserialize, Serialize};

use crate::PosClient;
use crate::error::PosError;
use crate::http::read_json;

/// A business location of the authorized merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Location {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.as_deref().is_none_or(|s| s == "ACTIVE")
    }
}

#[derive(Debug, Deserialize)]
struct LocationsResponse {
    #[serde(default)]
    locations: Vec<Location>,
}

impl PosClient {
    /// All locations visible to the current token.
    ///
    /// # Errors
    ///
    /// Returns any HTTP, API or parse error. A 401 is retried once after a
    /// token refresh.
    pub async fn get_locations(&self) -> Result<Vec<Location>, PosError> {
        let url = self.api_url("/locations");
        let resp = self.send_authorized(|client| client.get(&url)).await?;
        let body: LocationsResponse = read_json(resp, "locations").await?;
        tracing::debug!(count = body.locations.len(), "fetched locations");
        Ok(body.locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_location_list() {
        let body: LocationsResponse = serde_json::from_str(
            r#"{"locations":[
                {"id":"L1","name":"Main St","status":"ACTIVE","merchant_id":"M1","country":"US"},
                {"id":"L2","name":"Pop-up","status":"INACTIVE"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(body.locations.len(), 2);
        assert!(body.locations[0].is_active());
        assert!(!body.locations[1].is_active());
    }

    #[test]
    fn empty_response_has_no_locations() {
        let body: LocationsResponse = serde_json::from_str("{}").unwrap();
        assert!(body.locations.is_empty());
    }
}
