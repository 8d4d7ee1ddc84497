//! OAuth `state` values: issued with the authorize URL, consumed by the
//! code exchange.
//!
//! A state is `hex(sha256(owner_id ‖ unix_timestamp ‖ 16 random bytes))`.
//! Each one expires after the configured TTL and can be consumed once.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::PosError;
use crate::tokens::{read_optional, write_private};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct IssuedState {
    owner_id: String,
    expires_at: DateTime<Utc>,
}

/// Issued, not yet consumed states. Optionally mirrored to a JSON file so
/// that `auth url` and `auth exchange` can run as separate processes.
#[derive(Debug)]
pub struct StateStore {
    path: Option<PathBuf>,
    ttl: Duration,
    entries: Mutex<HashMap<String, IssuedState>>,
}

impl StateStore {
    #[must_use]
    pub fn in_memory(ttl_secs: u64) -> Self {
        Self {
            path: None,
            ttl: ttl(ttl_secs),
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn file(path: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            path: Some(path.into()),
            ttl: ttl(ttl_secs),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Generate and record a fresh state for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::Entropy`] if no nonce can be drawn, or
    /// [`PosError::TokenStore`] if the state file cannot be written.
    pub fn issue(&self, owner_id: &str) -> Result<String, PosError> {
        let now = Utc::now();
        let state = compute_state(owner_id, now.timestamp(), &nonce()?);

        let mut entries = self.lock()?;
        self.reload(&mut entries)?;
        entries.retain(|_, issued| issued.expires_at > now);
        entries.insert(
            state.clone(),
            IssuedState {
                owner_id: owner_id.to_string(),
                expires_at: now + self.ttl,
            },
        );
        self.persist(&entries)?;
        Ok(state)
    }

    /// Validate and remove `state`, returning the owner it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::InvalidState`] if the state was never issued, has
    /// already been used, or has expired.
    pub fn consume(&self, state: &str) -> Result<String, PosError> {
        let now = Utc::now();
        let mut entries = self.lock()?;
        self.reload(&mut entries)?;
        let issued = entries.remove(state);
        entries.retain(|_, issued| issued.expires_at > now);
        self.persist(&entries)?;

        match issued {
            None => Err(PosError::InvalidState(
                "unknown or already used state".into(),
            )),
            Some(issued) if issued.expires_at <= now => {
                Err(PosError::InvalidState("state expired".into()))
            }
            Some(issued) => Ok(issued.owner_id),
        }
    }

    /// Number of live (unexpired) states.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::TokenStore`] if the state file cannot be read.
    pub fn pending(&self) -> Result<usize, PosError> {
        let now = Utc::now();
        let mut entries = self.lock()?;
        self.reload(&mut entries)?;
        Ok(entries.values().filter(|s| s.expires_at > now).count())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, IssuedState>>, PosError> {
        self.entries
            .lock()
            .map_err(|_| PosError::TokenStore("state store lock poisoned".into()))
    }

    fn reload(&self, entries: &mut HashMap<String, IssuedState>) -> Result<(), PosError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        *entries = match read_optional(path)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| PosError::TokenStore(format!("parse {}: {e}", path.display())))?,
            None => HashMap::new(),
        };
        Ok(())
    }

    fn persist(&self, entries: &HashMap<String, IssuedState>) -> Result<(), PosError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| PosError::TokenStore(format!("serialize states: {e}")))?;
        write_private(path, json.as_bytes())
    }
}

// One day. Longer lifetimes defeat the point of the state check.
const MAX_TTL_SECS: i64 = 86_400;

fn ttl(secs: u64) -> Duration {
    Duration::seconds(i64::try_from(secs).unwrap_or(MAX_TTL_SECS).min(MAX_TTL_SECS))
}

fn nonce() -> Result<[u8; 16], PosError> {
    let mut bytes = [0u8; 16];
    getrandom::fill(&mut bytes).map_err(|e| PosError::Entropy(e.to_string()))?;
    Ok(bytes)
}

fn compute_state(owner_id: &str, timestamp: i64, nonce: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(owner_id.as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update(nonce);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn state_is_sha256_hex() {
        let state = compute_state("owner-1", 1_700_000_000, &[7u8; 16]);
        assert_eq!(state.len(), 64);
        assert!(state.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(state, compute_state("owner-1", 1_700_000_000, &[7u8; 16]));
        assert_ne!(state, compute_state("owner-2", 1_700_000_000, &[7u8; 16]));
        assert_ne!(state, compute_state("owner-1", 1_700_000_000, &[8u8; 16]));
    }

    #[test]
    fn issued_states_are_unique() {
        let store = StateStore::in_memory(600);
        let a = store.issue("owner-1").unwrap();
        let b = store.issue("owner-1").unwrap();
        assert_ne!(a, b);
        assert_eq!(store.pending().unwrap(), 2);
    }

    #[test]
    fn state_is_single_use() {
        let store = StateStore::in_memory(600);
        let state = store.issue("owner-1").unwrap();

        assert_eq!(store.consume(&state).unwrap(), "owner-1");
        let err = store.consume(&state).unwrap_err();
        assert!(matches!(err, PosError::InvalidState(_)));
    }

    #[test]
    fn unknown_state_rejected() {
        let store = StateStore::in_memory(600);
        assert!(matches!(
            store.consume("deadbeef"),
            Err(PosError::InvalidState(_))
        ));
    }

    #[test]
    fn zero_ttl_state_expires_immediately() {
        let store = StateStore::in_memory(0);
        let state = store.issue("owner-1").unwrap();
        assert!(matches!(
            store.consume(&state),
            Err(PosError::InvalidState(_))
        ));
    }

    #[test]
    fn file_store_survives_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oauth_states.json");

        let state = StateStore::file(&path, 600).issue("owner-9").unwrap();
        let reopened = StateStore::file(&path, 600);
        assert_eq!(reopened.consume(&state).unwrap(), "owner-9");
        assert_eq!(StateStore::file(&path, 600).pending().unwrap(), 0);
    }
}
