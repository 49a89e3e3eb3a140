//! Stock list and stock detail aggregation

use crate::api::types::{Asset, AssetOverview, Candle, PriceStats};
use crate::api::ApiClient;
use crate::error::Result;
use chrono::{Duration, Utc};
use futures_util::future::join_all;
use rand::Rng;
use tracing::{info, warn};

const HISTORY_DAYS: usize = 30;
const DETAIL_STATS_RANGE: &str = "month";
const MS_PER_DAY: i64 = 86_400_000;

/// One point of a mini chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSample {
    pub timestamp_ms: i64,
    pub price: f64,
}

/// Normalized row for the stock list and watchlist tables.
///
/// A row always exists for every input identifier; when the per-symbol
/// overview fetch failed, the numeric fields are `None` and the chart is
/// empty, but the row keeps its place in the list.
#[derive(Debug, Clone, PartialEq)]
pub struct StockRow {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub latest_price: Option<f64>,
    pub change_24h: Option<f64>,
    pub volume: Option<f64>,
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub chart_30d: Vec<ChartSample>,
}

impl StockRow {
    pub fn from_overview(overview: &AssetOverview) -> Self {
        let chart_30d = overview
            .chart30d
            .as_deref()
            .map(inline_chart_samples)
            .unwrap_or_default();
        Self {
            id: overview.id.clone(),
            symbol: overview.symbol.clone(),
            name: overview.name.clone(),
            latest_price: overview.current_price,
            change_24h: overview.change_percent,
            volume: overview.volume,
            pe: overview.pe_ratio,
            pb: overview.pb_ratio,
            chart_30d,
        }
    }

    /// Placeholder row for a symbol whose overview could not be fetched.
    pub fn unavailable(asset: &Asset) -> Self {
        Self {
            id: asset.id.clone(),
            symbol: asset.symbol.clone(),
            name: asset.name.clone(),
            latest_price: None,
            change_24h: None,
            volume: None,
            pe: None,
            pb: None,
            chart_30d: Vec::new(),
        }
    }
}

/// The server inlines `chart30d` as bare closes; spread them over synthetic
/// daily timestamps ending now.
fn inline_chart_samples(closes: &[f64]) -> Vec<ChartSample> {
    let now_ms = Utc::now().timestamp_millis();
    let len = closes.len() as i64;
    closes
        .iter()
        .enumerate()
        .map(|(i, price)| ChartSample {
            timestamp_ms: now_ms - (len - 1 - i as i64) * MS_PER_DAY,
            price: *price,
        })
        .collect()
}

/// Chart series for the detail page, flagged when synthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub candles: Vec<Candle>,
    /// True when the history endpoint gave nothing and the series was
    /// synthesized around the current price for visual continuity.
    pub synthetic: bool,
}

/// Everything the detail page renders for one symbol.
#[derive(Debug, Clone)]
pub struct StockDetail {
    pub overview: AssetOverview,
    pub history: ChartSeries,
    pub stats: Option<PriceStats>,
}

impl StockDetail {
    /// Absolute 24h change derived from price and percent, which the
    /// server does not send directly.
    pub fn abs_change_24h(&self) -> Option<f64> {
        let price = self.overview.current_price?;
        let percent = self.overview.change_percent?;
        Some(price * percent / 100.0)
    }
}

pub struct StockService;

impl StockService {
    /// Load the full stock list: one request for the asset list, then a
    /// concurrent per-symbol overview fan-out. Output order matches the
    /// asset list regardless of completion order, and a failed overview
    /// degrades to a nulled row rather than aborting the list.
    pub async fn load_rows(api: &ApiClient) -> Result<Vec<StockRow>> {
        let assets = api.list_assets().await?;
        info!(count = assets.len(), "loading stock list");

        let fetches = assets.iter().map(|asset| {
            let api = api.clone();
            async move {
                match api.asset_overview(&asset.symbol).await {
                    Ok(overview) => StockRow::from_overview(&overview),
                    Err(err) => {
                        warn!(symbol = %asset.symbol, "overview unavailable: {}", err);
                        StockRow::unavailable(asset)
                    }
                }
            }
        });

        Ok(join_all(fetches).await)
    }

    /// Load the detail page for one symbol: overview first (it resolves the
    /// asset id), then history and stats by id. A missing history falls
    /// back to a synthetic series; missing stats are simply absent.
    pub async fn load_detail(api: &ApiClient, symbol: &str) -> Result<StockDetail> {
        let overview = api.asset_overview(symbol).await?;

        let (history_res, stats_res) = tokio::join!(
            api.price_history(&overview.id, HISTORY_DAYS),
            api.price_stats(&overview.id, DETAIL_STATS_RANGE),
        );

        let history = match history_res {
            Ok(candles) if !candles.is_empty() => ChartSeries {
                candles,
                synthetic: false,
            },
            Ok(_) => synthetic_series(overview.current_price.unwrap_or(0.0)),
            Err(err) => {
                warn!(symbol = %overview.symbol, "price history unavailable: {}", err);
                synthetic_series(overview.current_price.unwrap_or(0.0))
            }
        };

        let stats = match stats_res {
            Ok(stats) => Some(stats),
            Err(err) => {
                warn!(symbol = %overview.symbol, "price stats unavailable: {}", err);
                None
            }
        };

        Ok(StockDetail {
            overview,
            history,
            stats,
        })
    }
}

/// Synthesize a 31-point daily series perturbed up to ±5% around the base
/// price. Strictly a visual stand-in; consumers can tell by the flag.
fn synthetic_series(base_price: f64) -> ChartSeries {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    let candles = (0..=HISTORY_DAYS)
        .rev()
        .map(|days_back| {
            let close = base_price * (1.0 + (rng.gen::<f64>() - 0.5) * 0.1);
            Candle {
                timestamp: Some((now - Duration::days(days_back as i64)).to_rfc3339()),
                open: close,
                high: close,
                low: close,
                close,
                volume: None,
            }
        })
        .collect();

    ChartSeries {
        candles,
        synthetic: true,
    }
}
