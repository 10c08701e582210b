use crate::clients::{CatalogClient, TvMazeClient};
use crate::config::Config;
use crate::db::Store;
use crate::domain::events::NotificationEvent;
use crate::services::{
    BulkImportOptions, BulkImportService, PopularityService, RefreshService, SyncService,
};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Shared wiring for every entry point: one store, one catalog client and
/// one event bus, with the engines constructed on top of them.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub catalog: Arc<dyn CatalogClient>,
    pub event_bus: broadcast::Sender<NotificationEvent>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self> {
        let store = Store::new(&config.general.database_path).await?;
        let catalog: Arc<dyn CatalogClient> = Arc::new(TvMazeClient::new(
            &config.catalog.base_url,
            Duration::from_secs(config.catalog.request_timeout_secs),
        ));
        let (event_bus, _) = broadcast::channel(256);

        Ok(Self {
            config,
            store,
            catalog,
            event_bus,
        })
    }

    #[must_use]
    pub fn sync_service(&self) -> SyncService {
        SyncService::new(self.store.clone(), self.catalog.clone())
    }

    #[must_use]
    pub fn refresh_service(&self) -> RefreshService {
        RefreshService::new(
            self.store.clone(),
            self.sync_service(),
            self.event_bus.clone(),
        )
    }

    #[must_use]
    pub fn popularity_service(&self) -> PopularityService {
        PopularityService::new(self.store.clone(), self.event_bus.clone())
    }

    #[must_use]
    pub fn import_service(&self) -> BulkImportService {
        BulkImportService::new(
            self.catalog.clone(),
            self.sync_service(),
            self.event_bus.clone(),
            BulkImportOptions {
                batch_size: self.config.import.batch_size,
                batch_delay: Duration::from_secs(self.config.import.batch_delay_secs),
            },
        )
    }
}
