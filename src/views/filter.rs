//! Filter predicates for list views
//!
//! Bounds arrive as raw form text; an empty or unparseable bound is a
//! no-op, matching how the forms behave while the user is still typing.

/// Inclusive numeric range over raw text bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeFilter {
    pub min: String,
    pub max: String,
}

impl RangeFilter {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    fn bound(raw: &str) -> Option<f64> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        raw.parse().ok()
    }

    /// Missing values are treated as zero, as the source forms do.
    pub fn matches(&self, value: Option<f64>) -> bool {
        let value = value.unwrap_or(0.0);
        if let Some(min) = Self::bound(&self.min) {
            if value < min {
                return false;
            }
        }
        if let Some(max) = Self::bound(&self.max) {
            if value > max {
                return false;
            }
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.min.trim().is_empty() && self.max.trim().is_empty()
    }
}

/// Trimmed, case-insensitive substring match; an empty needle matches all.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
