use std::sync::Arc;

use label_engine::{AssetStore, Assembler};
use tracing::info;

use crate::core::Config;
use crate::storage::ArtifactStore;
use crate::warehouse::WarehouseClient;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub assembler: Arc<Assembler>,
    pub warehouse: Arc<WarehouseClient>,
    pub storage: ArtifactStore,
}

impl AppState {
    pub fn initialize(config: Config) -> Self {
        let assets = AssetStore::new(&config.assets_dir);
        let assembler = Arc::new(Assembler::standard(assets));
        let warehouse = Arc::new(WarehouseClient::new(&config));
        let storage = ArtifactStore::new(&config.work_dir);

        info!(
            work_dir = %config.work_dir,
            assets_dir = %config.assets_dir,
            "application state initialized"
        );

        Self {
            config: Arc::new(config),
            assembler,
            warehouse,
            storage,
        }
    }
}
