//! # larder-config
//!
//! Layered configuration loading for Larder using figment.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`LARDER_*` prefix, `__` as separator)
//! 2. Project-level `.larder/config.toml`
//! 3. User-level `~/.config/larder/config.toml`
//! 4. Built-in defaults
//!
//! Nested keys use a double underscore: `LARDER_POS__CLIENT_ID` -> `pos.client_id`,
//! `LARDER_SYNC__MAX_CONCURRENCY` -> `sync.max_concurrency`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use larder_config::LarderConfig;
//!
//! let config = LarderConfig::load_with_dotenv().expect("config");
//! if config.pos.is_configured() {
//!     println!("POS app: {}", config.pos.client_id);
//! }
//! ```

mod error;
mod general;
mod pos;
mod sync;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use pos::PosConfig;
pub use sync::SyncConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const PROJECT_CONFIG: &str = ".larder/config.toml";
const ENV_PREFIX: &str = "LARDER_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LarderConfig {
    #[serde(default)]
    pub pos: PosConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl LarderConfig {
    /// Merge defaults, both TOML files and `LARDER_*` variables.
    ///
    /// `.env` files are not read here; see [`Self::load_with_dotenv`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::figment().extract()?)
    }

    /// Like [`Self::load`], after exporting a `.env` file if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env file is the common case.
        dotenvy::dotenv().ok();
        Self::load()
    }

    /// Provider chain, lowest priority first. Exposed for tests that layer
    /// extra providers.
    #[must_use]
    pub fn figment() -> Figment {
        let files = [Self::user_config_path(), Some(PathBuf::from(PROJECT_CONFIG))];
        files
            .into_iter()
            .flatten()
            .filter(|path| path.is_file())
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, path| figment.merge(Toml::file(path)),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Data directory as a path.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.general.data_dir)
    }

    /// Fail unless the POS OAuth application is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] naming the `pos` section.
    pub fn require_pos(&self) -> Result<&PosConfig, ConfigError> {
        if self.pos.is_configured() {
            Ok(&self.pos)
        } else {
            Err(ConfigError::NotConfigured {
                section: "pos".into(),
            })
        }
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("larder").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = LarderConfig::default();
        assert!(!config.pos.is_configured());
        assert_eq!(config.sync.max_concurrency, 4);
        assert_eq!(config.general.data_dir, ".larder");
    }

    #[test]
    fn require_pos_reports_section() {
        let config = LarderConfig::default();
        let err = config.require_pos().unwrap_err();
        assert!(err.to_string().contains("'pos'"));
    }
}
