//! Catalog filter and sort engine.
//!
//! # Responsibility
//! - Map (catalog, category filter, sort order) to the displayed sequence.
//!
//! # Invariants
//! - Filtering preserves the relative input order of retained entries.
//! - Sorting is stable; equal keys keep their post-filter order.
//! - Filter runs before sort; the sorted set is the already-narrowed one.

use crate::model::comic::{Comic, ComicCategory, SortOrder};

/// Returns the catalog entries surviving `category`, arranged by `order`.
///
/// Pure and deterministic; an empty catalog yields an empty result.
pub fn select_comics(catalog: &[Comic], category: ComicCategory, order: SortOrder) -> Vec<Comic> {
    let mut selected: Vec<Comic> = catalog
        .iter()
        .filter(|comic| category == ComicCategory::All || comic.category == category)
        .cloned()
        .collect();

    match order {
        SortOrder::None => {}
        SortOrder::ByRating => {
            selected.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        }
        SortOrder::ByDateAdded => {
            selected.sort_by(|a, b| a.date_released.cmp(&b.date_released));
        }
        SortOrder::ByName => {
            selected.sort_by(|a, b| b.name.cmp(&a.name));
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::select_comics;
    use crate::model::comic::{Comic, ComicCategory, SortOrder};
    use chrono::NaiveDate;

    fn comic(name: &str, rating: f64, category: ComicCategory) -> Comic {
        Comic::new(
            name,
            name.to_ascii_lowercase(),
            rating,
            NaiveDate::from_ymd_opt(2020, 1, 1).expect("test date should be valid"),
            category,
        )
        .expect("test comic should be valid")
    }

    #[test]
    fn wildcard_keeps_every_entry_in_input_order() {
        let catalog = vec![
            comic("A", 4.0, ComicCategory::Horror),
            comic("B", 6.0, ComicCategory::Action),
            comic("C", 6.0, ComicCategory::Fiction),
        ];

        let result = select_comics(&catalog, ComicCategory::All, SortOrder::None);

        assert_eq!(result, catalog);
    }

    #[test]
    fn rating_sort_is_descending_with_stable_ties() {
        // B and C tie on rating and must keep input order, B before C.
        let catalog = vec![
            comic("A", 4.0, ComicCategory::Horror),
            comic("B", 6.0, ComicCategory::Action),
            comic("C", 6.0, ComicCategory::Fiction),
        ];

        let result = select_comics(&catalog, ComicCategory::All, SortOrder::ByRating);

        let names: Vec<&str> = result.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["B", "C", "A"]);
    }

    #[test]
    fn category_filter_keeps_only_matching_entries() {
        let catalog = vec![
            comic("A", 4.0, ComicCategory::Horror),
            comic("B", 6.0, ComicCategory::Action),
            comic("C", 6.0, ComicCategory::Fiction),
        ];

        let result = select_comics(&catalog, ComicCategory::Action, SortOrder::None);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "B");
    }

    #[test]
    fn empty_catalog_yields_empty_result() {
        let result = select_comics(&[], ComicCategory::All, SortOrder::ByRating);
        assert!(result.is_empty());
    }
}
