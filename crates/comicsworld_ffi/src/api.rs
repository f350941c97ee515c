//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for the UI: envelopes, never exceptions.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Preference intents and reads all resolve against the same per-process
//!   database path.

use comicsworld_core::db::open_db;
use comicsworld_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Comic, ComicCategory, ComicsService, RepoResult, SortOrder, SqlitePreferencesRepository,
    StaticComicsRepository,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const PREFS_DB_FILE_NAME: &str = "comics_world_user_preferences.sqlite3";
static PREFS_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

type FfiService = ComicsService<StaticComicsRepository, SqlitePreferencesRepository>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Comic entry shaped for list rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ComicItem {
    /// Display name.
    pub name: String,
    /// Opaque asset key resolved by the UI.
    pub thumbnail: String,
    /// Editorial rating, 0.0..=10.0.
    pub rating: f64,
    /// Release date as `YYYY-MM-DD`.
    pub date_released: String,
    /// Category label (`ACTION|FICTION|HORROR`).
    pub category: String,
}

/// View-model envelope for the comics screen.
#[derive(Debug, Clone, PartialEq)]
pub struct UiModelResponse {
    /// Entries surviving the persisted filter, arranged by the persisted
    /// sort order. Empty on failure.
    pub comics: Vec<ComicItem>,
    /// Active category filter label (`ALL|ACTION|FICTION|HORROR`).
    pub comic_category: String,
    /// Active sort order label (`NONE|BY_RATING|BY_DATE_ADDED|BY_NAME`).
    pub sort_order: String,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Generic action response envelope for preference intents.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResponse {
    /// Whether the intent was applied.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Returns the combined view model for the comics screen.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - On storage failure, returns the default selection over an empty list
///   with a diagnostic message.
#[flutter_rust_bridge::frb(sync)]
pub fn comics_ui_model() -> UiModelResponse {
    let service = match open_service() {
        Ok(service) => service,
        Err(message) => {
            return UiModelResponse {
                comics: Vec::new(),
                comic_category: category_label(ComicCategory::All).to_owned(),
                sort_order: sort_order_label(SortOrder::None).to_owned(),
                message: format!("comics_ui_model failed: {message}"),
            };
        }
    };

    let model = service.current_ui_model();
    UiModelResponse {
        comics: model.comics.iter().map(to_comic_item).collect(),
        comic_category: category_label(model.user_preferences.comic_category).to_owned(),
        sort_order: sort_order_label(model.user_preferences.sort_order).to_owned(),
        message: format!("Loaded {} comic(s).", model.comics.len()),
    }
}

/// Applies the category filter intent.
///
/// Input semantics: `category` is one of `ALL|ACTION|FICTION|HORROR`
/// (canonical names). Unknown values are rejected.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn comics_filter_by_category(category: String) -> ActionResponse {
    let Some(category) = parse_category_label(category.trim()) else {
        return ActionResponse::failure(format!(
            "comics_filter_by_category failed: unknown category `{category}`"
        ));
    };
    run_intent("Filter applied.", "comics_filter_by_category", |service| {
        service.filter_by_category(category)
    })
}

/// Enables or disables the rating sort criterion.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn comics_enable_sort_by_rating(enabled: bool) -> ActionResponse {
    run_intent(
        "Rating sort updated.",
        "comics_enable_sort_by_rating",
        |service| service.enable_sort_by_rating(enabled),
    )
}

/// Enables or disables the release-date sort criterion.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn comics_enable_sort_by_date_added(enabled: bool) -> ActionResponse {
    run_intent(
        "Date sort updated.",
        "comics_enable_sort_by_date_added",
        |service| service.enable_sort_by_date_added(enabled),
    )
}

/// Enables or disables the name sort criterion.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn comics_enable_sort_by_name(enabled: bool) -> ActionResponse {
    run_intent(
        "Name sort updated.",
        "comics_enable_sort_by_name",
        |service| service.enable_sort_by_name(enabled),
    )
}

/// Clears the sort order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn comics_disable_sorting() -> ActionResponse {
    run_intent("Sorting disabled.", "comics_disable_sorting", |service| {
        service.disable_sorting()
    })
}

/// Restores the default filter and sort selection.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn comics_reset_filter_and_sort() -> ActionResponse {
    run_intent(
        "Filter and sort reset.",
        "comics_reset_filter_and_sort",
        |service| service.reset_filter_and_sort(),
    )
}

fn run_intent(
    success_message: &str,
    context: &str,
    f: impl FnOnce(&FfiService) -> RepoResult<()>,
) -> ActionResponse {
    let service = match open_service() {
        Ok(service) => service,
        Err(message) => return ActionResponse::failure(format!("{context} failed: {message}")),
    };
    match f(&service) {
        Ok(()) => ActionResponse::success(success_message),
        Err(err) => ActionResponse::failure(format!("{context} failed: {err}")),
    }
}

fn open_service() -> Result<FfiService, String> {
    let db_path = resolve_prefs_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("preference DB open failed: {err}"))?;
    let prefs_repo = SqlitePreferencesRepository::try_new(conn)
        .map_err(|err| format!("preference store init failed: {err}"))?;
    Ok(ComicsService::new(
        StaticComicsRepository::new(),
        prefs_repo,
    ))
}

fn resolve_prefs_db_path() -> PathBuf {
    PREFS_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("COMICSWORLD_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(PREFS_DB_FILE_NAME)
        })
        .clone()
}

fn to_comic_item(comic: &Comic) -> ComicItem {
    ComicItem {
        name: comic.name.clone(),
        thumbnail: comic.thumbnail.clone(),
        rating: comic.rating,
        date_released: comic.date_released.format("%Y-%m-%d").to_string(),
        category: category_label(comic.category).to_owned(),
    }
}

fn category_label(category: ComicCategory) -> &'static str {
    match category {
        ComicCategory::All => "ALL",
        ComicCategory::Action => "ACTION",
        ComicCategory::Fiction => "FICTION",
        ComicCategory::Horror => "HORROR",
    }
}

fn parse_category_label(value: &str) -> Option<ComicCategory> {
    match value {
        "ALL" => Some(ComicCategory::All),
        "ACTION" => Some(ComicCategory::Action),
        "FICTION" => Some(ComicCategory::Fiction),
        "HORROR" => Some(ComicCategory::Horror),
        _ => None,
    }
}

fn sort_order_label(order: SortOrder) -> &'static str {
    match order {
        SortOrder::None => "NONE",
        SortOrder::ByRating => "BY_RATING",
        SortOrder::ByDateAdded => "BY_DATE_ADDED",
        SortOrder::ByName => "BY_NAME",
    }
}
