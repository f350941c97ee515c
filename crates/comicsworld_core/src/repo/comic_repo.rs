//! Comic catalog provider contract and static implementation.
//!
//! # Responsibility
//! - Supply the catalog as a live sequence that emits at least once.
//! - Keep the hardcoded catalog data in one place.
//!
//! # Invariants
//! - Every published entry satisfies `Comic::validate()`; invalid entries
//!   are skipped with a warn event instead of failing catalog load.
//! - The static catalog never changes after construction.

use crate::model::comic::{Comic, ComicCategory};
use crate::observe::ObservableValue;
use chrono::NaiveDate;
use log::warn;

/// Catalog data source consumed by the view-state layer.
///
/// In this build the catalog is static; a networked or database-backed
/// provider would implement the same contract and push fresh snapshots
/// through the returned handle.
pub trait ComicsRepository {
    /// Returns the live catalog sequence. Subscribing to the handle delivers
    /// the current snapshot immediately.
    fn get_comics(&self) -> ObservableValue<Vec<Comic>>;
}

/// Fixed in-memory catalog provider.
pub struct StaticComicsRepository {
    comics: ObservableValue<Vec<Comic>>,
}

impl StaticComicsRepository {
    /// Creates the provider with the built-in catalog.
    pub fn new() -> Self {
        Self::with_comics(default_catalog())
    }

    /// Creates the provider with a caller-supplied catalog.
    ///
    /// Entries failing validation are dropped with a warn event; the
    /// provider itself never fails to construct.
    pub fn with_comics(entries: Vec<Comic>) -> Self {
        let comics: Vec<Comic> = entries
            .into_iter()
            .filter(|comic| match comic.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!(
                        "event=catalog_load module=catalog status=skipped name={} error={err}",
                        comic.name
                    );
                    false
                }
            })
            .collect();

        Self {
            comics: ObservableValue::new(comics),
        }
    }
}

impl Default for StaticComicsRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ComicsRepository for StaticComicsRepository {
    fn get_comics(&self) -> ObservableValue<Vec<Comic>> {
        self.comics.clone()
    }
}

fn default_catalog() -> Vec<Comic> {
    let entries = [
        (
            "Predator(2023-)",
            "predator",
            4.0,
            release_date(2023, 8, 3),
            ComicCategory::Action,
        ),
        (
            "Amazing Spider-Man (2022-)",
            "spiderman",
            5.0,
            release_date(2022, 7, 3),
            ComicCategory::Fiction,
        ),
        (
            "X-men(2021-)",
            "x_men",
            6.0,
            release_date(2021, 4, 1),
            ComicCategory::Horror,
        ),
        (
            "X-23:Deadly Regenesis(2023-)",
            "x_23",
            7.0,
            release_date(2023, 6, 7),
            ComicCategory::Fiction,
        ),
        (
            "New Mutants Lethal Legion(2022-)",
            "new_mutants",
            5.0,
            release_date(2022, 10, 5),
            ComicCategory::Action,
        ),
        (
            "Two Graves (2022-)",
            "two_graves",
            6.0,
            release_date(2022, 12, 1),
            ComicCategory::Horror,
        ),
        (
            "Spawn(1992-)",
            "spawn",
            7.0,
            release_date(1992, 7, 3),
            ComicCategory::Action,
        ),
    ];

    entries
        .into_iter()
        .filter_map(|(name, thumbnail, rating, date_released, category)| {
            match Comic::new(name, thumbnail, rating, date_released, category) {
                Ok(comic) => Some(comic),
                Err(err) => {
                    warn!(
                        "event=catalog_load module=catalog status=skipped name={name} error={err}"
                    );
                    None
                }
            }
        })
        .collect()
}

// A bad literal falls back to `NaiveDate::MIN` instead of panicking;
// tests/catalog.rs asserts no catalog entry hit the fallback.
fn release_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::{ComicsRepository, StaticComicsRepository};
    use crate::model::comic::{Comic, ComicCategory};
    use chrono::NaiveDate;

    #[test]
    fn with_comics_skips_invalid_entries() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).expect("test date should be valid");
        let valid =
            Comic::new("Valid", "valid", 5.0, date, ComicCategory::Action).expect("valid comic");
        let mut invalid = valid.clone();
        invalid.rating = 42.0;

        let repo = StaticComicsRepository::with_comics(vec![valid.clone(), invalid]);

        let comics = repo.get_comics().get();
        assert_eq!(comics, vec![valid]);
    }

    #[test]
    fn handles_from_the_same_provider_share_one_snapshot() {
        let repo = StaticComicsRepository::new();
        assert_eq!(repo.get_comics().get(), repo.get_comics().get());
    }
}
