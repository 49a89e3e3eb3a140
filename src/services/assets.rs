//! Asset cache for the admin views
//!
//! Mirrors the server's asset table plus a latest-price cache keyed by
//! asset id. State is replaced wholesale on refresh; nothing here survives
//! the process.

use crate::api::types::{Asset, PriceSnapshot};
use crate::api::ApiClient;
use crate::error::Result;
use dashmap::DashMap;
use futures_util::future::join_all;
use parking_lot::RwLock;
use tracing::{info, warn};

#[derive(Default)]
pub struct AssetStore {
    assets: RwLock<Vec<Asset>>,
    latest: DashMap<String, PriceSnapshot>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assets(&self) -> Vec<Asset> {
        self.assets.read().clone()
    }

    pub fn latest_price(&self, asset_id: &str) -> Option<PriceSnapshot> {
        self.latest.get(asset_id).map(|entry| entry.clone())
    }

    /// Replace the cached list with the server's current asset table.
    pub async fn refresh_all(&self, api: &ApiClient) -> Result<usize> {
        let assets = api.list_assets().await?;
        let count = assets.len();
        *self.assets.write() = assets;
        info!(count, "asset list refreshed");
        Ok(count)
    }

    /// Ask the server to pull newly listed symbols from its market source,
    /// then adopt the returned list.
    pub async fn refresh_market(&self, api: &ApiClient) -> Result<usize> {
        let assets = api.refresh_market_assets().await?;
        let count = assets.len();
        *self.assets.write() = assets;
        info!(count, "market assets refreshed");
        Ok(count)
    }

    /// Delete on the server, then drop the local copy on success.
    pub async fn delete(&self, api: &ApiClient, asset_id: &str) -> Result<()> {
        api.delete_asset(asset_id).await?;
        self.assets.write().retain(|asset| asset.id != asset_id);
        self.latest.remove(asset_id);
        Ok(())
    }

    /// Concurrent latest-price fan-out. Individual failures are logged and
    /// skipped; existing cache entries for failed ids are left untouched.
    pub async fn load_latest_prices(&self, api: &ApiClient, asset_ids: &[String]) {
        let fetches = asset_ids.iter().map(|id| {
            let api = api.clone();
            let id = id.clone();
            async move { (id.clone(), api.latest_price(&id).await) }
        });

        for (id, result) in join_all(fetches).await {
            match result {
                Ok(snapshot) => {
                    self.latest.insert(id, snapshot);
                }
                Err(err) => warn!(asset_id = %id, "latest price unavailable: {}", err),
            }
        }
    }

    /// Force the server to refetch one asset's price from its upstream
    /// source, then cache the fresh read.
    pub async fn refresh_price(&self, api: &ApiClient, asset_id: &str) -> Result<PriceSnapshot> {
        api.fetch_and_save_price(asset_id).await?;
        let snapshot = api.latest_price(asset_id).await?;
        self.latest.insert(asset_id.to_string(), snapshot.clone());
        Ok(snapshot)
    }
}
