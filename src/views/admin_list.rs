//! Admin asset-table controller
//!
//! The admin table sorts on identity columns only and has no filter form.

use super::sort::cmp_str;
use super::table::{Page, TableState};
use crate::api::types::Asset;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminColumn {
    Symbol,
    Name,
    Type,
}

pub fn compare(a: &Asset, b: &Asset, column: AdminColumn) -> Ordering {
    match column {
        AdminColumn::Symbol => cmp_str(Some(&a.symbol), Some(&b.symbol)),
        AdminColumn::Name => cmp_str(Some(&a.name), Some(&b.name)),
        AdminColumn::Type => cmp_str(Some(&a.asset_type), Some(&b.asset_type)),
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdminListController {
    pub table: TableState<AdminColumn>,
}

impl AdminListController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_sort(&mut self, column: AdminColumn) {
        self.table.toggle_sort(column);
    }

    pub fn set_page(&mut self, page: usize) {
        self.table.set_page(page);
    }

    pub fn visible(&self, assets: &[Asset]) -> Page<Asset> {
        self.table.apply(assets, |_| true, compare)
    }
}
