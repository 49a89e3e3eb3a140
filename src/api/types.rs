//! Wire types for the market data API
//!
//! Field names follow the server's camelCase JSON. Numeric fields the server
//! sometimes omits are `Option`s; the aggregation layer decides per view
//! whether absence means zero or "no data".

use serde::{Deserialize, Serialize};

/// Tradable asset identity. `symbol` is the external lookup key,
/// `id` is the join key used by the price and chart endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub asset_type: String,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// One point-in-time price read for an asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    #[serde(default)]
    pub asset_id: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default, alias = "changePercent24h")]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub high24h: Option<f64>,
    #[serde(default)]
    pub low24h: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Chart endpoint sample (close price only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
    pub price: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

/// History endpoint candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Server-computed aggregate of identity, latest price and valuation
/// metrics for one symbol. The client only reshapes this, never builds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetOverview {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub pb_ratio: Option<f64>,
    #[serde(default)]
    pub high24h: Option<f64>,
    #[serde(default)]
    pub low24h: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default, rename = "marketCap_static")]
    pub market_cap_static: Option<f64>,
    #[serde(default)]
    pub shares_outstanding: Option<f64>,
    #[serde(default)]
    pub ev_to_ebitda: Option<f64>,
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default)]
    pub book_value: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// Last ~30 closes, oldest first, when the server inlines them.
    #[serde(default)]
    pub chart30d: Option<Vec<f64>>,
}

/// Ranked top gainer/loser entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopMover {
    pub asset_id: String,
    pub asset_symbol: String,
    #[serde(default)]
    pub asset_name: String,
    pub price: f64,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

/// Which ranking the top-movers endpoint should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverDirection {
    Gainers,
    Losers,
}

impl MoverDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            MoverDirection::Gainers => "gainers",
            MoverDirection::Losers => "losers",
        }
    }
}

/// Aggregate price statistics over a range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceStats {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub avg: Option<f64>,
    #[serde(default)]
    pub ytd_change: Option<f64>,
}

/// Change over a trailing window of hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChange {
    #[serde(default)]
    pub percent: Option<f64>,
    #[serde(default)]
    pub absolute: Option<f64>,
}

/// Handle returned when the bulk price-update job is started.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHandle {
    pub job_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Server-side job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Done,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub status: JobStatus,
}

/// Authenticated user profile as the server reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, alias = "sub")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "picture")]
    pub avatar_url: Option<String>,
}

/// Fields the profile edit form may change.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Username/password login response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_tolerates_missing_metrics() {
        let overview: AssetOverview = serde_json::from_str(
            r#"{"id":"a1","symbol":"FPT","name":"FPT Corp","currentPrice":98.5}"#,
        )
        .unwrap();
        assert_eq!(overview.current_price, Some(98.5));
        assert_eq!(overview.pe_ratio, None);
        assert_eq!(overview.chart30d, None);
    }

    #[test]
    fn job_status_wire_format() {
        let resp: JobStatusResponse = serde_json::from_str(r#"{"status":"RUNNING"}"#).unwrap();
        assert_eq!(resp.status, JobStatus::Running);
        assert!(!resp.status.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn snapshot_accepts_legacy_change_field() {
        let snap: PriceSnapshot =
            serde_json::from_str(r#"{"price":10.0,"changePercent24h":-1.2}"#).unwrap();
        assert_eq!(snap.change_percent, Some(-1.2));
    }
}
