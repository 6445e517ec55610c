use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use lacteos_store::{AuthClient, DataClient, StorageClient};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::{cache::BoardCache, config::Config, notify::ToastQueue};

pub struct AppState {
    pub config: Config,
    pub data: DataClient,
    pub storage: StorageClient,
    pub auth: AuthClient,
    pub cache: BoardCache,
    pub toasts: ToastQueue,
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        Self::with_config(Config::load()).await
    }

    pub async fn with_config(config: Config) -> Arc<Self> {
        let data = DataClient::new(&config.backend_url, &config.service_key);
        let storage = StorageClient::new(&config.backend_url, &config.service_key);
        let auth = AuthClient::new(&config.backend_url, &config.anon_key);
        let cache = BoardCache::connect(&config.redis_url, config.board_ttl_seconds).await;

        Arc::new(Self {
            config,
            data,
            storage,
            auth,
            cache,
            toasts: ToastQueue::new(),
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Serializes read-then-write sequences on one ordering scope. The
    /// uniqueness and cap checks are advisory reads, so every writer for a
    /// scope takes its lock across the read and the write.
    pub async fn lock_scope(&self, scope: &str) -> OwnedMutexGuard<()> {
        let cell = {
            let mut locks = self.locks.lock().unwrap();
            locks
                .entry(scope.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        cell.lock_owned().await
    }
}
