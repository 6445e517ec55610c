//! Board cache.
//!
//! Admin list views and the public TV boards read through redis keys with a
//! long TTL; every successful mutation deletes the keys for its entity kind
//! so the boards pick up changes without waiting out the TTL. The cache is
//! strictly an accelerator: when redis is missing or misbehaving every read
//! falls through to the remote store with a warning.

use std::time::Duration;

use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    AsyncCommands,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

pub const ADMIN_CATEGORIES: &str = "admin:categorias";
pub const ADMIN_PRODUCTS: &str = "admin:productos";
pub const ADMIN_VIDEOS: &str = "admin:videos";
pub const ADMIN_GALLERY: &str = "admin:galeria";

pub const TV_PRODUCTS: &str = "tv:productos";
pub const TV_MENU: &str = "tv:menu";
pub const TV_VIDEOS: &str = "tv:videos";
pub const TV_GALLERY: &str = "tv:galeria";

/// Keys to drop after a category or product mutation. Categories feed both
/// product boards through the joined view, so the two kinds share one set.
pub const PRODUCT_KEYS: [&str; 4] = [ADMIN_CATEGORIES, ADMIN_PRODUCTS, TV_PRODUCTS, TV_MENU];
pub const VIDEO_KEYS: [&str; 2] = [ADMIN_VIDEOS, TV_VIDEOS];
pub const GALLERY_KEYS: [&str; 2] = [ADMIN_GALLERY, TV_GALLERY];

pub struct BoardCache {
    conn: Option<ConnectionManager>,
    ttl: u64,
}

impl BoardCache {
    /// An empty URL disables caching outright; a connection failure merely
    /// logs and serves uncached.
    pub async fn connect(redis_url: &str, ttl: u64) -> Self {
        if redis_url.is_empty() {
            return Self { conn: None, ttl };
        }

        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(Duration::from_millis(100));

        let conn = match redis::Client::open(redis_url) {
            Ok(client) => match client.get_connection_manager_with_config(config).await {
                Ok(conn) => Some(conn),
                Err(e) => {
                    warn!("Redis unavailable, serving uncached: {e}");
                    None
                }
            },
            Err(e) => {
                warn!("Invalid redis URL, serving uncached: {e}");
                None
            }
        };

        Self { conn, ttl }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone()?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).ok(),
            Ok(None) => None,
            Err(e) => {
                warn!("Cache read for {key} failed: {e}");
                None
            }
        }
    }

    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Serializing cache entry {key} failed: {e}");
                return;
            }
        };
        if let Err(e) = conn.set_ex::<_, _, ()>(key, raw, self.ttl).await {
            warn!("Cache write for {key} failed: {e}");
        }
    }

    pub async fn invalidate(&self, keys: &[&str]) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        if let Err(e) = conn.del::<_, ()>(keys.to_vec()).await {
            warn!("Cache invalidation for {keys:?} failed: {e}");
        }
    }
}
