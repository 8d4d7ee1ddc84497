use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use larder_config::LarderConfig;
use larder_pos::PosClient;

use crate::cli::GlobalFlags;
use crate::store::FileStore;

const STORE_FILE_NAME: &str = "store.json";

/// Configuration and local store shared by command handlers.
pub struct AppContext {
    pub config: LarderConfig,
    pub store: Arc<FileStore>,
}

impl AppContext {
    pub fn init(mut config: LarderConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        if let Some(data_dir) = &flags.data_dir {
            config.general.data_dir.clone_from(data_dir);
        }
        if let Some(owner) = &flags.owner {
            config.general.owner_id.clone_from(owner);
        }

        let store = FileStore::open(config.data_dir().join(STORE_FILE_NAME))?;
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.config.data_dir()
    }

    /// Owner the command acts for.
    pub fn owner_id(&self) -> anyhow::Result<&str> {
        let owner = self.config.general.owner_id.as_str();
        if owner.is_empty() {
            anyhow::bail!("no owner configured: pass --owner or set LARDER_GENERAL__OWNER_ID");
        }
        Ok(owner)
    }

    pub fn pos_client(&self) -> anyhow::Result<PosClient> {
        PosClient::from_config(&self.config).context("failed to initialize POS client")
    }
}
