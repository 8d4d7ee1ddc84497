//! General application configuration.

use serde::{Deserialize, Serialize};

fn default_data_dir() -> String {
    ".larder".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Directory holding the local store snapshot, tokens and OAuth states.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Default account owner used when a command does not pass `--owner`.
    #[serde(default)]
    pub owner_id: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            owner_id: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.data_dir, ".larder");
        assert!(config.owner_id.is_empty());
    }
}
