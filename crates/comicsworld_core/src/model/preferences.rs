//! Persisted user choice for filtering and sorting.
//!
//! # Invariants
//! - `Default` is the wildcard filter with sorting disabled; it is also the
//!   value substituted whenever durable storage is absent or unreadable.

use crate::model::comic::{ComicCategory, SortOrder};
use serde::{Deserialize, Serialize};

/// Filter/sort selection loaded from durable storage at startup.
///
/// Mutated only through preference-store operations; a reset restores the
/// default value instead of erasing storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub comic_category: ComicCategory,
    pub sort_order: SortOrder,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            comic_category: ComicCategory::All,
            sort_order: SortOrder::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UserPreferences;
    use crate::model::comic::{ComicCategory, SortOrder};

    #[test]
    fn default_is_wildcard_filter_without_sorting() {
        let prefs = UserPreferences::default();
        assert_eq!(prefs.comic_category, ComicCategory::All);
        assert_eq!(prefs.sort_order, SortOrder::None);
    }
}
