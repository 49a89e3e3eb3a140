//! Stock list view controller
//!
//! Owns the filter set, sort state, and pagination for the all-stocks
//! table. Works on a snapshot of rows already produced by the aggregation
//! layer; it never fetches.

use super::filter::{contains_ci, RangeFilter};
use super::sort::{cmp_f64, cmp_str};
use super::table::{Page, TableState};
use crate::services::StockRow;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockColumn {
    Symbol,
    Name,
    LatestPrice,
    Change24h,
    Volume,
    Pe,
    Pb,
}

/// All filter inputs of the stock list form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockListFilter {
    pub symbol: String,
    pub name: String,
    pub price: RangeFilter,
    pub change: RangeFilter,
    pub volume: RangeFilter,
    pub pe: RangeFilter,
    pub pb: RangeFilter,
}

impl StockListFilter {
    pub fn matches(&self, row: &StockRow) -> bool {
        contains_ci(&row.symbol, &self.symbol)
            && contains_ci(&row.name, &self.name)
            && self.price.matches(row.latest_price)
            && self.change.matches(row.change_24h)
            && self.volume.matches(row.volume)
            && self.pe.matches(row.pe)
            && self.pb.matches(row.pb)
    }
}

pub fn compare(a: &StockRow, b: &StockRow, column: StockColumn) -> Ordering {
    match column {
        StockColumn::Symbol => cmp_str(Some(&a.symbol), Some(&b.symbol)),
        StockColumn::Name => cmp_str(Some(&a.name), Some(&b.name)),
        StockColumn::LatestPrice => cmp_f64(a.latest_price, b.latest_price),
        StockColumn::Change24h => cmp_f64(a.change_24h, b.change_24h),
        StockColumn::Volume => cmp_f64(a.volume, b.volume),
        StockColumn::Pe => cmp_f64(a.pe, b.pe),
        StockColumn::Pb => cmp_f64(a.pb, b.pb),
    }
}

#[derive(Debug, Clone, Default)]
pub struct StockListController {
    pub table: TableState<StockColumn>,
    pub filter: StockListFilter,
}

impl StockListController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edit any filter field; the page resets to 1 as part of the same
    /// action, per the view contract.
    pub fn edit_filter(&mut self, edit: impl FnOnce(&mut StockListFilter)) {
        edit(&mut self.filter);
        self.table.on_filter_changed();
    }

    pub fn reset_filters(&mut self) {
        self.filter = StockListFilter::default();
        self.table.on_filter_changed();
    }

    pub fn toggle_sort(&mut self, column: StockColumn) {
        self.table.toggle_sort(column);
    }

    pub fn set_page(&mut self, page: usize) {
        self.table.set_page(page);
    }

    pub fn visible(&self, rows: &[StockRow]) -> Page<StockRow> {
        self.table
            .apply(rows, |row| self.filter.matches(row), compare)
    }
}
