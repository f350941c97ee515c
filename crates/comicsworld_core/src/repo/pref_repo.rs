//! Preference store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the category filter and sort order under the fixed
//!   `user_preferences` namespace.
//! - Expose the current selection as a live value and apply the conditional
//!   sort-toggle transitions.
//!
//! # Invariants
//! - Stored values are the enumeration's canonical name string; unrecognized
//!   or missing values resolve to defaults at read time, never to errors.
//! - Read failures degrade to `UserPreferences::default()` and are logged,
//!   never surfaced to the caller.
//! - A mutation whose transition result equals the stored value writes
//!   nothing and emits nothing.
//! - Failed writes leave both the persisted state and the published value
//!   untouched.

use crate::db::{migrations::latest_version, DbError};
use crate::model::comic::{ComicCategory, SortOrder};
use crate::model::preferences::UserPreferences;
use crate::observe::ObservableValue;
use log::{error, info, warn};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PREFERENCES_TABLE: &str = "user_preferences";
const SORT_ORDER_KEY: &str = "sort_order";
const COMIC_CATEGORY_KEY: &str = "comic_category";
const REQUIRED_COLUMNS: &[&str] = &["pref_key", "pref_value"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for preference persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection has not been migrated to the supported schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Migrated connection is missing a required table.
    MissingRequiredTable(&'static str),
    /// Migrated connection is missing a required column.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable filter/sort selection store.
///
/// Mutations are serialized through the implementation's own connection;
/// observers see each distinct state exactly once.
pub trait PreferencesRepository {
    /// Returns the live preference sequence. Subscribing delivers the
    /// current value immediately and again on every change.
    fn observe_preferences(&self) -> ObservableValue<UserPreferences>;

    /// Sets the category filter. Writing the stored value is a no-op.
    fn set_category_filter(&self, category: ComicCategory) -> RepoResult<()>;

    /// Enabling selects rating order; disabling clears to `None` only when
    /// rating order is the one currently active.
    fn enable_sort_by_rating(&self, enabled: bool) -> RepoResult<()>;

    /// Enabling selects date order; disabling clears to `None` only when
    /// date order is the one currently active.
    fn enable_sort_by_date_added(&self, enabled: bool) -> RepoResult<()>;

    /// Enabling selects name order; disabling clears to `None` only when
    /// name order is the one currently active.
    fn enable_sort_by_name(&self, enabled: bool) -> RepoResult<()>;

    /// Unconditionally clears the sort order to `None`.
    fn disable_sorting(&self) -> RepoResult<()>;

    /// Restores the category filter to the wildcard `All`.
    fn reset_category_filter(&self) -> RepoResult<()>;
}

/// SQLite-backed preference store.
pub struct SqlitePreferencesRepository {
    conn: Connection,
    current: ObservableValue<UserPreferences>,
}

impl SqlitePreferencesRepository {
    /// Wraps a migrated connection, loading the stored selection.
    ///
    /// Absent or unreadable stored state loads as the default selection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the preference namespace.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_schema_ready(&conn)?;
        let current = ObservableValue::new(load_or_default(&conn));
        Ok(Self { conn, current })
    }

    fn transition_sort(&self, update: impl FnOnce(SortOrder) -> SortOrder) -> RepoResult<()> {
        let stored = load_or_default(&self.conn);
        let new_order = update(stored.sort_order);
        if new_order == stored.sort_order {
            return Ok(());
        }

        self.write_value(SORT_ORDER_KEY, sort_order_to_db(new_order))?;
        self.current.set(UserPreferences {
            sort_order: new_order,
            ..stored
        });
        Ok(())
    }

    fn write_value(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO user_preferences (pref_key, pref_value)
             VALUES (?1, ?2)
             ON CONFLICT(pref_key) DO UPDATE SET
                pref_value = excluded.pref_value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        info!("event=prefs_write module=prefs status=ok key={key} value={value}");
        Ok(())
    }
}

impl PreferencesRepository for SqlitePreferencesRepository {
    fn observe_preferences(&self) -> ObservableValue<UserPreferences> {
        self.current.clone()
    }

    fn set_category_filter(&self, category: ComicCategory) -> RepoResult<()> {
        let stored = load_or_default(&self.conn);
        if stored.comic_category == category {
            return Ok(());
        }

        self.write_value(COMIC_CATEGORY_KEY, category_to_db(category))?;
        self.current.set(UserPreferences {
            comic_category: category,
            ..stored
        });
        Ok(())
    }

    fn enable_sort_by_rating(&self, enabled: bool) -> RepoResult<()> {
        self.transition_sort(|current| toggle_sort(current, SortOrder::ByRating, enabled))
    }

    fn enable_sort_by_date_added(&self, enabled: bool) -> RepoResult<()> {
        self.transition_sort(|current| toggle_sort(current, SortOrder::ByDateAdded, enabled))
    }

    fn enable_sort_by_name(&self, enabled: bool) -> RepoResult<()> {
        self.transition_sort(|current| toggle_sort(current, SortOrder::ByName, enabled))
    }

    fn disable_sorting(&self) -> RepoResult<()> {
        self.transition_sort(|_| SortOrder::None)
    }

    fn reset_category_filter(&self) -> RepoResult<()> {
        self.set_category_filter(ComicCategory::All)
    }
}

/// Conditional toggle transition shared by the three sort criteria.
///
/// Enabling always selects `criterion`; disabling clears to `None` only when
/// `criterion` is the active order, otherwise the current order is kept.
fn toggle_sort(current: SortOrder, criterion: SortOrder, enabled: bool) -> SortOrder {
    if enabled {
        criterion
    } else if current == criterion {
        SortOrder::None
    } else {
        current
    }
}

fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
        [PREFERENCES_TABLE],
        |row| row.get(0),
    )?;
    if table_count == 0 {
        return Err(RepoError::MissingRequiredTable(PREFERENCES_TABLE));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(user_preferences);")?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>("name")?);
    }
    for column in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: PREFERENCES_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn load_or_default(conn: &Connection) -> UserPreferences {
    let sort_order = match read_value(conn, SORT_ORDER_KEY) {
        Some(raw) => parse_sort_order(&raw).unwrap_or_else(|| {
            warn!(
                "event=prefs_read module=prefs status=defaulted key={SORT_ORDER_KEY} value={raw}"
            );
            SortOrder::None
        }),
        None => SortOrder::None,
    };
    let comic_category = match read_value(conn, COMIC_CATEGORY_KEY) {
        Some(raw) => parse_category(&raw).unwrap_or_else(|| {
            warn!(
                "event=prefs_read module=prefs status=defaulted key={COMIC_CATEGORY_KEY} value={raw}"
            );
            ComicCategory::All
        }),
        None => ComicCategory::All,
    };

    UserPreferences {
        comic_category,
        sort_order,
    }
}

fn read_value(conn: &Connection, key: &str) -> Option<String> {
    let result = (|| -> rusqlite::Result<Option<String>> {
        let mut stmt =
            conn.prepare("SELECT pref_value FROM user_preferences WHERE pref_key = ?1;")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    })();

    match result {
        Ok(value) => value,
        Err(err) => {
            error!("event=prefs_read module=prefs status=error key={key} error={err}");
            None
        }
    }
}

fn sort_order_to_db(order: SortOrder) -> &'static str {
    match order {
        SortOrder::None => "NONE",
        SortOrder::ByRating => "BY_RATING",
        SortOrder::ByDateAdded => "BY_DATE_ADDED",
        SortOrder::ByName => "BY_NAME",
    }
}

fn parse_sort_order(value: &str) -> Option<SortOrder> {
    match value {
        "NONE" => Some(SortOrder::None),
        "BY_RATING" => Some(SortOrder::ByRating),
        "BY_DATE_ADDED" => Some(SortOrder::ByDateAdded),
        "BY_NAME" => Some(SortOrder::ByName),
        _ => None,
    }
}

fn category_to_db(category: ComicCategory) -> &'static str {
    match category {
        ComicCategory::All => "ALL",
        ComicCategory::Action => "ACTION",
        ComicCategory::Fiction => "FICTION",
        ComicCategory::Horror => "HORROR",
    }
}

fn parse_category(value: &str) -> Option<ComicCategory> {
    match value {
        "ALL" => Some(ComicCategory::All),
        "ACTION" => Some(ComicCategory::Action),
        "FICTION" => Some(ComicCategory::Fiction),
        "HORROR" => Some(ComicCategory::Horror),
        _ => None,
    }
}
