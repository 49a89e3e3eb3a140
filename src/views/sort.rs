//! Sort state and field comparators

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Tri-state sort: no key means "server/fetch order".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<C> {
    pub key: Option<C>,
    pub direction: SortDirection,
}

impl<C: Copy + PartialEq> Default for SortState<C> {
    fn default() -> Self {
        Self {
            key: None,
            direction: SortDirection::Asc,
        }
    }
}

impl<C: Copy + PartialEq> SortState<C> {
    /// Clicking the active column flips direction; a new column starts
    /// ascending.
    pub fn toggle(&mut self, column: C) {
        if self.key == Some(column) {
            self.direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.key = Some(column);
            self.direction = SortDirection::Asc;
        }
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.direction = SortDirection::Asc;
    }
}

/// Case-insensitive string comparison; `None` sorts as the minimum.
pub fn cmp_str(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            let folded = a.to_lowercase().cmp(&b.to_lowercase());
            // Stable tiebreak so "FPT" and "fpt" stay distinguishable.
            folded.then_with(|| a.cmp(b))
        }
    }
}

/// Numeric comparison; `None` (and NaN) sorts as the minimum.
pub fn cmp_f64(a: Option<f64>, b: Option<f64>) -> Ordering {
    let rank = |v: Option<f64>| v.filter(|v| !v.is_nan());
    match (rank(a), rank(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}
