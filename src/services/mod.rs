//! Data-aggregation layer
//!
//! One service per view. Each issues the minimal set of upstream requests
//! through the [`crate::api::ApiClient`] and reshapes the answers into one
//! normalized row form, whatever shape the server answered with.

pub mod assets;
pub mod dashboard;
pub mod profile;
pub mod stock;
pub mod watchlist;

pub use assets::AssetStore;
pub use dashboard::{DashboardData, DashboardService};
pub use profile::ProfileService;
pub use stock::{ChartSample, ChartSeries, StockDetail, StockRow, StockService};
pub use watchlist::WatchlistService;
