//! Dashboard aggregation: top movers and the selected-symbol chart

use crate::api::types::{ChartPoint, MoverDirection, TopMover};
use crate::api::ApiClient;
use crate::error::{AppError, Result};
use tracing::info;

pub const TOP_MOVERS_LIMIT: usize = 5;

const CHART_INTERVAL: &str = "1m";
const CHART_LIMIT: usize = 100;

/// Both ranked lists plus the default chart selection.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub gainers: Vec<TopMover>,
    pub losers: Vec<TopMover>,
    /// Defaults to the first gainer when there is one.
    pub selected_symbol: Option<String>,
}

impl DashboardData {
    /// Resolve a displayed symbol to the asset id the chart endpoint needs.
    pub fn resolve_asset_id(&self, symbol: &str) -> Option<&str> {
        self.gainers
            .iter()
            .chain(self.losers.iter())
            .find(|mover| mover.asset_symbol == symbol)
            .map(|mover| mover.asset_id.as_str())
    }
}

pub struct DashboardService;

impl DashboardService {
    /// Fetch gainers and losers as two independent ranked lists,
    /// concurrently.
    pub async fn load(api: &ApiClient) -> Result<DashboardData> {
        let (gainers, losers) = tokio::join!(
            api.top_movers(MoverDirection::Gainers, TOP_MOVERS_LIMIT),
            api.top_movers(MoverDirection::Losers, TOP_MOVERS_LIMIT),
        );
        let gainers = gainers?;
        let losers = losers?;
        info!(
            gainers = gainers.len(),
            losers = losers.len(),
            "dashboard movers loaded"
        );

        let selected_symbol = gainers.first().map(|mover| mover.asset_symbol.clone());
        Ok(DashboardData {
            gainers,
            losers,
            selected_symbol,
        })
    }

    /// Chart for a symbol picked from either mover table. The symbol must
    /// resolve against the loaded movers; charts are keyed by asset id.
    pub async fn chart_for(
        api: &ApiClient,
        data: &DashboardData,
        symbol: &str,
    ) -> Result<Vec<ChartPoint>> {
        let asset_id = data
            .resolve_asset_id(symbol)
            .ok_or_else(|| AppError::NotFound(format!("unknown symbol {symbol}")))?;
        api.price_chart(asset_id, CHART_INTERVAL, CHART_LIMIT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mover(id: &str, symbol: &str) -> TopMover {
        serde_json::from_value(serde_json::json!({
            "assetId": id,
            "assetSymbol": symbol,
            "assetName": symbol,
            "price": 1.0,
        }))
        .unwrap()
    }

    #[test]
    fn resolves_symbols_from_both_lists() {
        let data = DashboardData {
            gainers: vec![mover("a1", "FPT")],
            losers: vec![mover("a2", "VIC")],
            selected_symbol: Some("FPT".into()),
        };
        assert_eq!(data.resolve_asset_id("VIC"), Some("a2"));
        assert_eq!(data.resolve_asset_id("FPT"), Some("a1"));
        assert_eq!(data.resolve_asset_id("NOPE"), None);
    }
}
