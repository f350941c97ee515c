//! Comic domain model.
//!
//! # Responsibility
//! - Define the canonical comic record supplied by the catalog provider.
//! - Define the closed filter/sort enumerations used across the core.
//!
//! # Invariants
//! - `rating` is finite and stays within 0.0..=10.0.
//! - `name` is never blank.
//! - `ComicCategory::All` is a wildcard filter value; no catalog entry
//!   carries it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest rating a comic record may carry.
pub const MIN_COMIC_RATING: f64 = 0.0;
/// Highest rating a comic record may carry.
pub const MAX_COMIC_RATING: f64 = 10.0;

/// Closed category enumeration for catalog entries and the category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComicCategory {
    /// Wildcard filter value meaning "no filtering".
    All,
    Action,
    Fiction,
    Horror,
}

/// Mutually exclusive sort criteria; at most one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// No reordering; filtered order is preserved.
    None,
    /// Descending by rating.
    ByRating,
    /// Ascending by release date.
    ByDateAdded,
    /// Descending by name.
    ByName,
}

/// Validation failures for comic record construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ComicValidationError {
    /// Name is empty or whitespace-only.
    BlankName,
    /// Rating is non-finite or outside 0.0..=10.0.
    RatingOutOfRange(f64),
    /// A catalog entry must carry a concrete category, never the wildcard.
    WildcardCategory,
}

impl Display for ComicValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "comic name must not be blank"),
            Self::RatingOutOfRange(rating) => write!(
                f,
                "comic rating {rating} outside {MIN_COMIC_RATING}..={MAX_COMIC_RATING}"
            ),
            Self::WildcardCategory => {
                write!(f, "comic category must not be the wildcard `All`")
            }
        }
    }
}

impl Error for ComicValidationError {}

/// Immutable comic record.
///
/// Created once at catalog-load time and never mutated; equality is
/// structural, there is no identity beyond the field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comic {
    /// Display name, e.g. `Spawn(1992-)`.
    pub name: String,
    /// Opaque asset handle resolved by the presentation layer.
    pub thumbnail: String,
    /// Editorial rating, 0.0..=10.0.
    pub rating: f64,
    /// Release date, calendar day granularity.
    pub date_released: NaiveDate,
    /// Concrete category; never `ComicCategory::All`.
    pub category: ComicCategory,
}

impl Comic {
    /// Creates a validated comic record.
    ///
    /// # Errors
    /// - `BlankName` when `name` trims to empty.
    /// - `RatingOutOfRange` when `rating` is non-finite or outside range.
    /// - `WildcardCategory` when `category` is `ComicCategory::All`.
    pub fn new(
        name: impl Into<String>,
        thumbnail: impl Into<String>,
        rating: f64,
        date_released: NaiveDate,
        category: ComicCategory,
    ) -> Result<Self, ComicValidationError> {
        let comic = Self {
            name: name.into(),
            thumbnail: thumbnail.into(),
            rating,
            date_released,
            category,
        };
        comic.validate()?;
        Ok(comic)
    }

    /// Checks record invariants without consuming the value.
    pub fn validate(&self) -> Result<(), ComicValidationError> {
        if self.name.trim().is_empty() {
            return Err(ComicValidationError::BlankName);
        }
        if !self.rating.is_finite()
            || self.rating < MIN_COMIC_RATING
            || self.rating > MAX_COMIC_RATING
        {
            return Err(ComicValidationError::RatingOutOfRange(self.rating));
        }
        if self.category == ComicCategory::All {
            return Err(ComicValidationError::WildcardCategory);
        }
        Ok(())
    }
}
