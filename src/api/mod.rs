//! HTTP client adapter for the market data API
//!
//! All outbound traffic goes through [`ApiClient`]: it owns the base origin,
//! the request timeout, bearer-token attachment, error mapping, and the
//! envelope normalization that the rest of the crate relies on. Aggregation
//! code never touches raw responses.

pub mod types;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::storage::{KeyValueStorage, AUTH_TOKEN_KEY};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;
use types::*;

/// Client for the remote REST API.
///
/// Cheap to clone; clones share the connection pool and the storage handle.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    storage: Arc<dyn KeyValueStorage>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url,
            storage,
        })
    }

    /// Unwrap the server's inconsistent response envelopes.
    ///
    /// Some endpoints wrap payloads as `{"data": T}`, some as
    /// `{"content": T}` (paged responses), some return `T` bare. This is a
    /// known server-side inconsistency; tolerating it lives here and nowhere
    /// else.
    pub(crate) fn unwrap_envelope(value: Value) -> Value {
        if let Value::Object(ref map) = value {
            if let Some(inner) = map.get("data") {
                return inner.clone();
            }
            if let Some(inner) = map.get("content") {
                return inner.clone();
            }
        }
        value
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?method, "api request");

        let mut req = self.http.request(method, &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = self.storage.get(AUTH_TOKEN_KEY) {
            if !token.is_empty() {
                req = req.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        // Error bodies are not always JSON; keep whatever the server said.
        let parsed = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        if !status.is_success() {
            return Err(AppError::Response {
                status: status.as_u16(),
                body: parsed,
            });
        }

        Ok(parsed)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let value = self.request(Method::GET, path, query, None).await?;
        Ok(serde_json::from_value(Self::unwrap_envelope(value))?)
    }

    /// Like [`Self::get`] but an absent/null payload decodes to empty.
    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let value = self.request(Method::GET, path, query, None).await?;
        match Self::unwrap_envelope(value) {
            Value::Null => Ok(Vec::new()),
            unwrapped => Ok(serde_json::from_value(unwrapped)?),
        }
    }

    // ------------------------------------------------------------------
    // Assets
    // ------------------------------------------------------------------

    pub async fn list_assets(&self) -> Result<Vec<Asset>> {
        self.get_list("/assets", &[]).await
    }

    pub async fn asset_overview(&self, symbol: &str) -> Result<AssetOverview> {
        self.get(&format!("/assets/{symbol}/overview"), &[]).await
    }

    /// Empty queries short-circuit without a request.
    pub async fn search_assets(&self, query: &str) -> Result<Vec<Asset>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.get_list("/assets/search", &[("query", query.to_string())])
            .await
    }

    /// Pull any newly listed market symbols into the server's asset table.
    pub async fn refresh_market_assets(&self) -> Result<Vec<Asset>> {
        self.get_list("/assets/market/stocks/new", &[]).await
    }

    pub async fn delete_asset(&self, asset_id: &str) -> Result<()> {
        self.request(Method::DELETE, &format!("/assets/{asset_id}"), &[], None)
            .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Prices
    // ------------------------------------------------------------------

    pub async fn latest_price(&self, asset_id: &str) -> Result<PriceSnapshot> {
        self.get(&format!("/prices/{asset_id}/latest"), &[]).await
    }

    pub async fn price_chart(
        &self,
        asset_id: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<ChartPoint>> {
        self.get_list(
            &format!("/prices/{asset_id}/chart"),
            &[
                ("interval", interval.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    /// Most recent `limit` history candles (server pages newest-first).
    pub async fn price_history(&self, asset_id: &str, limit: usize) -> Result<Vec<Candle>> {
        self.get_list(
            &format!("/prices/{asset_id}/history/paged"),
            &[("page", "0".to_string()), ("size", limit.to_string())],
        )
        .await
    }

    pub async fn price_stats(&self, asset_id: &str, range: &str) -> Result<PriceStats> {
        self.get(
            &format!("/prices/{asset_id}/stats"),
            &[("range", range.to_string())],
        )
        .await
    }

    pub async fn price_change(&self, asset_id: &str, hours: u32) -> Result<PriceChange> {
        self.get(
            &format!("/prices/{asset_id}/change"),
            &[("hours", hours.to_string())],
        )
        .await
    }

    pub async fn top_movers(
        &self,
        direction: MoverDirection,
        limit: usize,
    ) -> Result<Vec<TopMover>> {
        self.get_list(
            "/prices/top",
            &[
                ("type", direction.as_str().to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    /// Ask the server to fetch a fresh price from its upstream source and
    /// persist it, returning the new snapshot.
    pub async fn fetch_and_save_price(&self, asset_id: &str) -> Result<PriceSnapshot> {
        let value = self
            .request(Method::POST, &format!("/prices/{asset_id}/fetch"), &[], None)
            .await?;
        Ok(serde_json::from_value(Self::unwrap_envelope(value))?)
    }

    pub async fn start_fetch_all(&self) -> Result<JobHandle> {
        let value = self
            .request(Method::POST, "/prices/fetch-all/start", &[], None)
            .await?;
        Ok(serde_json::from_value(Self::unwrap_envelope(value))?)
    }

    pub async fn fetch_all_status(&self, job_id: &str) -> Result<JobStatus> {
        let resp: JobStatusResponse = self
            .get(&format!("/prices/fetch-all/status/{job_id}"), &[])
            .await?;
        Ok(resp.status)
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub async fn current_user(&self) -> Result<UserProfile> {
        self.get("/users/me", &[]).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile> {
        let value = self
            .request(
                Method::PUT,
                "/users/me",
                &[],
                Some(serde_json::to_value(update)?),
            )
            .await?;
        Ok(serde_json::from_value(Self::unwrap_envelope(value))?)
    }

    pub async fn watchlist(&self) -> Result<Vec<String>> {
        self.get_list("/users/watchlist", &[]).await
    }

    pub async fn add_to_watchlist(&self, symbol: &str) -> Result<()> {
        self.request(
            Method::POST,
            "/users/watchlist",
            &[],
            Some(json!({ "symbol": symbol })),
        )
        .await?;
        Ok(())
    }

    pub async fn remove_from_watchlist(&self, symbol: &str) -> Result<()> {
        self.request(
            Method::DELETE,
            "/users/watchlist",
            &[],
            Some(json!({ "symbol": symbol })),
        )
        .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse> {
        let value = self
            .request(
                Method::POST,
                "/auth/login",
                &[],
                Some(json!({ "username": username, "password": password })),
            )
            .await?;
        Ok(serde_json::from_value(Self::unwrap_envelope(value))?)
    }
}
