use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::evidence::EvidenceStore;

/// Request-scoped dependencies shared by every handler. Nothing here is
/// process-global: tests build as many independent instances as they need.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub evidence: Arc<EvidenceStore>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let evidence = Arc::new(EvidenceStore::new(&config.uploads.path));
        evidence.ensure_exists().await?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            evidence,
        })
    }
}
