use comicsworld_core::db::migrations::latest_version;
use comicsworld_core::db::{open_db, open_db_in_memory};
use comicsworld_core::{
    ComicCategory, PreferencesRepository, RepoError, SortOrder, SqlitePreferencesRepository,
    UserPreferences,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn fresh_store() -> SqlitePreferencesRepository {
    let conn = open_db_in_memory().unwrap();
    SqlitePreferencesRepository::try_new(conn).unwrap()
}

fn record_emissions(
    store: &SqlitePreferencesRepository,
) -> (
    Arc<Mutex<Vec<UserPreferences>>>,
    comicsworld_core::Subscription,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let sub = store
        .observe_preferences()
        .subscribe(move |prefs| sink.lock().unwrap().push(*prefs));
    (seen, sub)
}

#[test]
fn fresh_store_observes_defaults_immediately() {
    let store = fresh_store();
    let (seen, _sub) = record_emissions(&store);

    assert_eq!(*seen.lock().unwrap(), vec![UserPreferences::default()]);
}

#[test]
fn category_filter_round_trips_through_observation() {
    let store = fresh_store();
    let (seen, _sub) = record_emissions(&store);

    store.set_category_filter(ComicCategory::Horror).unwrap();

    let last = *seen.lock().unwrap().last().unwrap();
    assert_eq!(last.comic_category, ComicCategory::Horror);
    assert_eq!(last.sort_order, SortOrder::None);
}

#[test]
fn writing_the_stored_category_is_a_no_op_without_emission() {
    let store = fresh_store();
    store.set_category_filter(ComicCategory::Action).unwrap();

    let (seen, _sub) = record_emissions(&store);
    store.set_category_filter(ComicCategory::Action).unwrap();

    // Only the replay of the current value on subscription.
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn enabling_a_sort_criterion_selects_it() {
    let store = fresh_store();

    store.enable_sort_by_rating(true).unwrap();
    assert_eq!(
        store.observe_preferences().get().sort_order,
        SortOrder::ByRating
    );

    store.enable_sort_by_name(true).unwrap();
    assert_eq!(
        store.observe_preferences().get().sort_order,
        SortOrder::ByName
    );
}

#[test]
fn disabling_the_active_criterion_clears_the_sort_order() {
    let store = fresh_store();

    store.enable_sort_by_date_added(true).unwrap();
    store.enable_sort_by_date_added(false).unwrap();

    assert_eq!(
        store.observe_preferences().get().sort_order,
        SortOrder::None
    );
}

#[test]
fn disabling_an_inactive_criterion_leaves_the_order_unchanged() {
    let store = fresh_store();
    store.enable_sort_by_rating(true).unwrap();

    let (seen, _sub) = record_emissions(&store);
    store.enable_sort_by_name(false).unwrap();
    store.enable_sort_by_date_added(false).unwrap();

    assert_eq!(
        store.observe_preferences().get().sort_order,
        SortOrder::ByRating
    );
    // No emission beyond the subscription replay.
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn disable_sorting_clears_unconditionally() {
    let store = fresh_store();

    store.enable_sort_by_name(true).unwrap();
    store.disable_sorting().unwrap();
    assert_eq!(
        store.observe_preferences().get().sort_order,
        SortOrder::None
    );

    // Already cleared; stays cleared.
    store.disable_sorting().unwrap();
    assert_eq!(
        store.observe_preferences().get().sort_order,
        SortOrder::None
    );
}

#[test]
fn reset_category_filter_restores_the_wildcard() {
    let store = fresh_store();

    store.set_category_filter(ComicCategory::Fiction).unwrap();
    store.reset_category_filter().unwrap();

    assert_eq!(
        store.observe_preferences().get().comic_category,
        ComicCategory::All
    );
}

#[test]
fn unrecognized_stored_values_resolve_to_defaults() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO user_preferences (pref_key, pref_value) VALUES
            ('sort_order', 'SOMETHING'),
            ('comic_category', 'by_rating');",
        [],
    )
    .unwrap();

    let store = SqlitePreferencesRepository::try_new(conn).unwrap();

    assert_eq!(
        store.observe_preferences().get(),
        UserPreferences::default()
    );
}

#[test]
fn preferences_survive_a_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.db");

    {
        let store = SqlitePreferencesRepository::try_new(open_db(&path).unwrap()).unwrap();
        store.set_category_filter(ComicCategory::Horror).unwrap();
        store.enable_sort_by_name(true).unwrap();
    }

    let reopened = SqlitePreferencesRepository::try_new(open_db(&path).unwrap()).unwrap();
    let prefs = reopened.observe_preferences().get();
    assert_eq!(prefs.comic_category, ComicCategory::Horror);
    assert_eq!(prefs.sort_order, SortOrder::ByName);
}

#[test]
fn stored_values_use_canonical_enumeration_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.db");

    let store = SqlitePreferencesRepository::try_new(open_db(&path).unwrap()).unwrap();
    store.set_category_filter(ComicCategory::Action).unwrap();
    store.enable_sort_by_date_added(true).unwrap();
    drop(store);

    let conn = Connection::open(&path).unwrap();
    let category: String = conn
        .query_row(
            "SELECT pref_value FROM user_preferences WHERE pref_key = 'comic_category';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    let sort_order: String = conn
        .query_row(
            "SELECT pref_value FROM user_preferences WHERE pref_key = 'sort_order';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(category, "ACTION");
    assert_eq!(sort_order, "BY_DATE_ADDED");
}

#[test]
fn failed_write_surfaces_an_error_and_leaves_published_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.db");

    let store = SqlitePreferencesRepository::try_new(open_db(&path).unwrap()).unwrap();
    store.set_category_filter(ComicCategory::Fiction).unwrap();

    // A second connection tears the namespace out from under the store.
    let saboteur = Connection::open(&path).unwrap();
    saboteur
        .execute_batch("DROP TABLE user_preferences;")
        .unwrap();

    let err = store.set_category_filter(ComicCategory::Horror).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(
        store.observe_preferences().get().comic_category,
        ComicCategory::Fiction
    );
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqlitePreferencesRepository::try_new(conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_preferences_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePreferencesRepository::try_new(conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("user_preferences"))
    ));
}

#[test]
fn store_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE user_preferences (
            pref_key TEXT PRIMARY KEY NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePreferencesRepository::try_new(conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "user_preferences",
            column: "pref_value"
        })
    ));
}
