//! Core domain logic for ComicsWorld.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod observe;
pub mod repo;
pub mod selection;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::comic::{Comic, ComicCategory, ComicValidationError, SortOrder};
pub use model::preferences::UserPreferences;
pub use observe::{ObservableValue, Subscription};
pub use repo::comic_repo::{ComicsRepository, StaticComicsRepository};
pub use repo::pref_repo::{
    PreferencesRepository, RepoError, RepoResult, SqlitePreferencesRepository,
};
pub use selection::select_comics;
pub use service::comics_service::{ComicsService, ComicsUiModel, UiModelSubscription};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
