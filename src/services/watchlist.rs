//! Watchlist aggregation
//!
//! The server keeps membership as a set of symbols for the current user;
//! the client enriches each symbol with its overview and a 30-day chart.

use super::stock::{ChartSample, StockRow};
use crate::api::types::ChartPoint;
use crate::api::ApiClient;
use crate::error::Result;
use futures_util::future::join_all;
use tracing::{info, warn};

const CHART_INTERVAL: &str = "1d";
const CHART_LIMIT: usize = 30;

pub struct WatchlistService;

impl WatchlistService {
    /// Load the watchlist rows: symbols first, then a per-symbol fan-out of
    /// overview plus 30-day chart. Row order follows the server's symbol
    /// order; a failed overview yields a nulled row keyed by the symbol,
    /// and a failed chart only costs the chart.
    pub async fn load_rows(api: &ApiClient) -> Result<Vec<StockRow>> {
        let symbols = api.watchlist().await?;
        info!(count = symbols.len(), "loading watchlist");

        let fetches = symbols.into_iter().map(|symbol| {
            let api = api.clone();
            async move { Self::load_row(&api, symbol).await }
        });

        Ok(join_all(fetches).await)
    }

    async fn load_row(api: &ApiClient, symbol: String) -> StockRow {
        let overview = match api.asset_overview(&symbol).await {
            Ok(overview) => overview,
            Err(err) => {
                warn!(%symbol, "watchlist overview unavailable: {}", err);
                // Identity falls back to the symbol itself.
                return StockRow {
                    id: symbol.clone(),
                    symbol,
                    name: String::new(),
                    latest_price: None,
                    change_24h: None,
                    volume: None,
                    pe: None,
                    pb: None,
                    chart_30d: Vec::new(),
                };
            }
        };

        let chart_30d = match api
            .price_chart(&overview.id, CHART_INTERVAL, CHART_LIMIT)
            .await
        {
            Ok(points) => chart_samples(&points),
            Err(err) => {
                warn!(%symbol, "watchlist chart unavailable: {}", err);
                Vec::new()
            }
        };

        let mut row = StockRow::from_overview(&overview);
        row.chart_30d = chart_30d;
        row
    }

    pub async fn add(api: &ApiClient, symbol: &str) -> Result<()> {
        api.add_to_watchlist(symbol).await
    }

    pub async fn remove(api: &ApiClient, symbol: &str) -> Result<()> {
        api.remove_from_watchlist(symbol).await
    }
}

/// The chart endpoint is loose about timestamp types (epoch millis or an
/// ISO string); points without a usable timestamp are dropped.
fn chart_samples(points: &[ChartPoint]) -> Vec<ChartSample> {
    points
        .iter()
        .filter_map(|point| {
            let timestamp_ms = match point.timestamp.as_ref()? {
                serde_json::Value::Number(n) => n.as_i64()?,
                serde_json::Value::String(raw) => chrono::DateTime::parse_from_rfc3339(raw)
                    .ok()?
                    .timestamp_millis(),
                _ => return None,
            };
            Some(ChartSample {
                timestamp_ms,
                price: point.price,
            })
        })
        .collect()
}
