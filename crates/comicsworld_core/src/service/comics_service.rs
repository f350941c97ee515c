//! View-state coordinator for the comics screen.
//!
//! # Responsibility
//! - Combine the latest catalog snapshot and persisted preferences into one
//!   observable view model, recomputing on every upstream change.
//! - Forward user intents to the preference store unchanged.
//!
//! # Invariants
//! - An emitted view model's `comics` always equals
//!   `select_comics(catalog, prefs.comic_category, prefs.sort_order)`.
//! - Upstream subscriptions are held while at least one consumer is
//!   subscribed, plus a grace period after the last one leaves.
//! - Teardown is cooperative; no timers run while the pipeline is idle.

use crate::model::comic::{Comic, ComicCategory};
use crate::model::preferences::UserPreferences;
use crate::observe::{ObservableValue, Subscription};
use crate::repo::comic_repo::ComicsRepository;
use crate::repo::pref_repo::{PreferencesRepository, RepoResult};
use crate::selection::select_comics;
use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Grace period for transient unsubscribe/resubscribe cycles, e.g. a UI
/// reconfiguration recreating its observers.
const RESUBSCRIBE_GRACE: Duration = Duration::from_millis(500);

/// Derived, ephemeral view state consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComicsUiModel {
    /// Catalog entries surviving the filter, arranged by the sort order.
    pub comics: Vec<Comic>,
    /// The selection the entries were derived from.
    pub user_preferences: UserPreferences,
}

struct ShareState {
    upstream: Vec<Subscription>,
    active_subscribers: usize,
    idle_since: Option<Instant>,
}

/// Combines catalog and preferences into the observable [`ComicsUiModel`]
/// and forwards presentation intents to the preference store.
pub struct ComicsService<C: ComicsRepository, P: PreferencesRepository> {
    catalog_repo: C,
    prefs_repo: P,
    catalog: ObservableValue<Vec<Comic>>,
    prefs: ObservableValue<UserPreferences>,
    ui_model: ObservableValue<ComicsUiModel>,
    share: Arc<Mutex<ShareState>>,
    grace: Duration,
}

impl<C: ComicsRepository, P: PreferencesRepository> ComicsService<C, P> {
    /// Creates the coordinator with the default resubscribe grace period.
    pub fn new(catalog_repo: C, prefs_repo: P) -> Self {
        Self::with_grace_period(catalog_repo, prefs_repo, RESUBSCRIBE_GRACE)
    }

    /// Creates the coordinator with an explicit grace period.
    pub fn with_grace_period(catalog_repo: C, prefs_repo: P, grace: Duration) -> Self {
        let catalog = catalog_repo.get_comics();
        let prefs = prefs_repo.observe_preferences();
        Self {
            catalog_repo,
            prefs_repo,
            catalog,
            prefs,
            ui_model: ObservableValue::new(ComicsUiModel::default()),
            share: Arc::new(Mutex::new(ShareState {
                upstream: Vec::new(),
                active_subscribers: 0,
                idle_since: None,
            })),
            grace,
        }
    }

    /// Subscribes to the combined view model.
    ///
    /// The first subscriber connects the upstream catalog and preference
    /// subscriptions; the current model is delivered before this returns.
    pub fn subscribe_ui_model(
        &self,
        callback: impl Fn(&ComicsUiModel) + Send + Sync + 'static,
    ) -> UiModelSubscription {
        {
            let mut share = lock_share(&self.share);
            self.connect_upstream(&mut share);
            share.active_subscribers += 1;
            share.idle_since = None;
        }

        UiModelSubscription {
            _output: self.ui_model.subscribe(callback),
            _consumer: ConsumerGuard {
                share: Arc::clone(&self.share),
            },
        }
    }

    /// Snapshot of the view model from the current catalog and preferences.
    ///
    /// Computed on demand; does not require an active subscription.
    pub fn current_ui_model(&self) -> ComicsUiModel {
        build_ui_model(&self.catalog, &self.prefs)
    }

    /// Releases upstream subscriptions when no consumer remains and the
    /// grace period has elapsed. Safe to call at any time.
    pub fn release_if_idle(&self) {
        let mut share = lock_share(&self.share);
        if share.active_subscribers > 0 || share.upstream.is_empty() {
            return;
        }
        let Some(idle_since) = share.idle_since else {
            return;
        };
        if idle_since.elapsed() < self.grace {
            return;
        }

        share.upstream.clear();
        share.idle_since = None;
        info!("event=view_state_release module=service status=ok");
    }

    /// Requests filtering by `category`.
    pub fn filter_by_category(&self, category: ComicCategory) -> RepoResult<()> {
        self.forward("filter_by_category", || {
            self.prefs_repo.set_category_filter(category)
        })
    }

    /// Requests enabling/disabling the rating sort criterion.
    pub fn enable_sort_by_rating(&self, enabled: bool) -> RepoResult<()> {
        self.forward("enable_sort_by_rating", || {
            self.prefs_repo.enable_sort_by_rating(enabled)
        })
    }

    /// Requests enabling/disabling the release-date sort criterion.
    pub fn enable_sort_by_date_added(&self, enabled: bool) -> RepoResult<()> {
        self.forward("enable_sort_by_date_added", || {
            self.prefs_repo.enable_sort_by_date_added(enabled)
        })
    }

    /// Requests enabling/disabling the name sort criterion.
    pub fn enable_sort_by_name(&self, enabled: bool) -> RepoResult<()> {
        self.forward("enable_sort_by_name", || {
            self.prefs_repo.enable_sort_by_name(enabled)
        })
    }

    /// Requests clearing the sort order.
    pub fn disable_sorting(&self) -> RepoResult<()> {
        self.forward("disable_sorting", || self.prefs_repo.disable_sorting())
    }

    /// Requests restoring the default filter and sort selection.
    pub fn reset_filter_and_sort(&self) -> RepoResult<()> {
        self.forward("reset_filter_and_sort", || {
            self.prefs_repo
                .reset_category_filter()
                .and_then(|()| self.prefs_repo.disable_sorting())
        })
    }

    fn forward(&self, intent: &str, op: impl FnOnce() -> RepoResult<()>) -> RepoResult<()> {
        let result = op();
        if let Err(err) = &result {
            warn!("event=intent_forward module=service status=error intent={intent} error={err}");
        }
        self.release_if_idle();
        result
    }

    fn connect_upstream(&self, share: &mut ShareState) {
        if !share.upstream.is_empty() {
            return;
        }

        let recompute = {
            let catalog = self.catalog_repo.get_comics();
            let prefs = self.prefs_repo.observe_preferences();
            let ui_model = self.ui_model.clone();
            move || {
                ui_model.set(build_ui_model(&catalog, &prefs));
            }
        };

        // Each subscription replays the current upstream value, so the view
        // model is recomputed from fresh snapshots before any consumer
        // attaches to it.
        let catalog_sub = self.catalog.subscribe({
            let recompute = recompute.clone();
            move |_| recompute()
        });
        let prefs_sub = self.prefs.subscribe(move |_| recompute());

        share.upstream = vec![catalog_sub, prefs_sub];
        info!("event=view_state_connect module=service status=ok");
    }
}

fn build_ui_model(
    catalog: &ObservableValue<Vec<Comic>>,
    prefs: &ObservableValue<UserPreferences>,
) -> ComicsUiModel {
    let user_preferences = prefs.get();
    let comics = select_comics(
        &catalog.get(),
        user_preferences.comic_category,
        user_preferences.sort_order,
    );
    ComicsUiModel {
        comics,
        user_preferences,
    }
}

fn lock_share(share: &Arc<Mutex<ShareState>>) -> MutexGuard<'_, ShareState> {
    match share.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Consumer handle for the combined view model; dropping it unsubscribes
/// and starts the grace period once no consumer remains.
pub struct UiModelSubscription {
    _output: Subscription,
    _consumer: ConsumerGuard,
}

struct ConsumerGuard {
    share: Arc<Mutex<ShareState>>,
}

impl Drop for ConsumerGuard {
    fn drop(&mut self) {
        let mut share = lock_share(&self.share);
        share.active_subscribers = share.active_subscribers.saturating_sub(1);
        if share.active_subscribers == 0 {
            share.idle_since = Some(Instant::now());
        }
    }
}
