//! Per-view transient state
//!
//! Sort keys, filters, pagination, and the latest-wins fetch guard. All of
//! it is synchronous and presentation-free; controllers transform row
//! snapshots the aggregation layer produced.

pub mod admin_list;
pub mod filter;
pub mod generation;
pub mod sort;
pub mod stock_list;
pub mod table;

pub use admin_list::{AdminColumn, AdminListController};
pub use filter::RangeFilter;
pub use generation::{Generation, GenerationToken};
pub use sort::{SortDirection, SortState};
pub use stock_list::{StockColumn, StockListController, StockListFilter};
pub use table::{Page, TableState, PAGE_SIZE};
