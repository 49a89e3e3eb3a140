//! Generic table view state: filter, then sort, then paginate
//!
//! The pipeline order is a contract: filtering runs before sorting, sorting
//! before pagination, and any filter change resets the page to 1.

use super::sort::SortState;
use std::cmp::Ordering;

pub const PAGE_SIZE: usize = 20;

/// One rendered page plus the counters the pager needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub rows: Vec<R>,
    /// Rows surviving the filter, across all pages.
    pub filtered_total: usize,
    pub total_pages: usize,
    pub page: usize,
}

/// Sort and pagination state for one list view.
#[derive(Debug, Clone)]
pub struct TableState<C> {
    pub sort: SortState<C>,
    /// 1-based current page.
    pub page: usize,
    pub page_size: usize,
}

impl<C: Copy + PartialEq> Default for TableState<C> {
    fn default() -> Self {
        Self {
            sort: SortState::default(),
            page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

impl<C: Copy + PartialEq> TableState<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_sort(&mut self, column: C) {
        self.sort.toggle(column);
    }

    /// Call whenever any filter input changes.
    pub fn on_filter_changed(&mut self) {
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Run the pipeline over a snapshot of rows.
    ///
    /// `filter` decides row visibility; `compare` orders two rows under a
    /// sort column (direction is applied here). With no sort key the fetch
    /// order is kept.
    pub fn apply<R: Clone>(
        &self,
        rows: &[R],
        filter: impl Fn(&R) -> bool,
        compare: impl Fn(&R, &R, C) -> Ordering,
    ) -> Page<R> {
        let mut visible: Vec<R> = rows.iter().filter(|r| filter(r)).cloned().collect();

        if let Some(key) = self.sort.key {
            let direction = self.sort.direction;
            visible.sort_by(|a, b| direction.apply(compare(a, b, key)));
        }

        let filtered_total = visible.len();
        let total_pages = filtered_total.div_ceil(self.page_size).max(1);
        let page = self.page.clamp(1, total_pages);

        let start = (page - 1) * self.page_size;
        let rows = visible
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();

        Page {
            rows,
            filtered_total,
            total_pages,
            page,
        }
    }
}
