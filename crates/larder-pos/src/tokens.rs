//! OAuth token persistence.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PosError;

/// Tokens issued for one merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub merchant_id: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenSet {
    /// Whether the provider's stated expiry has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

/// Where tokens live between runs.
#[derive(Debug, Clone)]
pub enum TokenStore {
    /// JSON file, written with owner-only permissions.
    File(PathBuf),
    /// Nothing is persisted; tokens only live in the client.
    Disabled,
}

impl TokenStore {
    /// Load stored tokens. A missing or empty file is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::TokenStore`] if the file exists but cannot be read
    /// or parsed.
    pub fn load(&self) -> Result<Option<TokenSet>, PosError> {
        let Self::File(path) = self else {
            return Ok(None);
        };
        let Some(raw) = read_optional(path)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| PosError::TokenStore(format!("parse {}: {e}", path.display())))
    }

    /// Persist `tokens`, replacing anything stored.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::TokenStore`] if the file cannot be written.
    pub fn save(&self, tokens: &TokenSet) -> Result<(), PosError> {
        let Self::File(path) = self else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(tokens)
            .map_err(|e| PosError::TokenStore(format!("serialize tokens: {e}")))?;
        write_private(path, json.as_bytes())
    }

    /// Remove stored tokens.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::TokenStore`] if the file cannot be removed.
    pub fn clear(&self) -> Result<(), PosError> {
        if let Self::File(path) = self
            && path.exists()
        {
            fs::remove_file(path).map_err(|e| {
                PosError::TokenStore(format!("failed to delete {}: {e}", path.display()))
            })?;
        }
        Ok(())
    }
}

pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, PosError> {
    match fs::read_to_string(path) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PosError::TokenStore(format!("read {}: {e}", path.display()))),
    }
}

/// Write `bytes` to `path`, creating the parent with 0700 and the file with 0600.
pub(crate) fn write_private(path: &Path, bytes: &[u8]) -> Result<(), PosError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| PosError::TokenStore(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, bytes)
        .map_err(|e| PosError::TokenStore(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| PosError::TokenStore(format!("chmod {}: {e}", path.display())))?;
    }

    Ok(())
}
