//! Home feed: the request lifecycle of the paginated recipe list.
//!
//! A query change (search text or filters) bumps the request generation,
//! resets the page cursor and loads page 1. Next pages are appended on
//! scroll proximity or manual request. Completions from a superseded
//! generation are discarded, and at most one list request per generation is
//! in flight at a time.

use crate::api::{RecipeApi, RecipeQuery};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{AppError, Result};
use crate::models::{Recipe, RecipePage};
use crate::samples::sample_recipes;
use crate::services::scroll_observer::{ScrollObserver, Subscription};
use crate::services::search_debouncer::SearchDebouncer;
use crate::state::{FilterPatch, PaginationCursor, SharedState, lock};
use log::{debug, error, info, warn};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// What to show when the first page cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// Fill the list with the built-in sample recipes.
    #[default]
    UseBuiltInSample,
    /// Leave the list empty.
    ShowEmpty,
}

impl FromStr for RecoveryPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sample" | "samples" => Ok(RecoveryPolicy::UseBuiltInSample),
            "empty" => Ok(RecoveryPolicy::ShowEmpty),
            other => Err(AppError::Config(format!(
                "unknown first-page recovery policy {:?} (expected \"sample\" or \"empty\")",
                other
            ))),
        }
    }
}

/// Lifecycle phase of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    LoadingFirstPage,
    /// `degraded` is set when the first page failed and recovery data is shown.
    Ready { degraded: bool },
}

impl fmt::Display for FeedPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedPhase::Idle => write!(f, "idle"),
            FeedPhase::LoadingFirstPage => write!(f, "loading"),
            FeedPhase::Ready { degraded: false } => write!(f, "ready"),
            FeedPhase::Ready { degraded: true } => write!(f, "ready (degraded)"),
        }
    }
}

/// Result of a load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was applied to the feed.
    Applied,
    /// The load failed and the failure was applied to the feed.
    Failed,
    /// A newer query started while this one was running; the response was dropped.
    Stale,
    /// Nothing was requested.
    Skipped,
}

/// Point-in-time copy of the feed for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub phase: FeedPhase,
    pub recipes: Vec<Recipe>,
    pub error: Option<String>,
    pub total: Option<u64>,
    pub cursor: PaginationCursor,
    pub search: String,
}

impl FeedSnapshot {
    /// Whether the manual "load more" control should be offered.
    pub fn can_load_more(&self) -> bool {
        matches!(self.phase, FeedPhase::Ready { .. })
            && self.cursor.has_more()
            && !self.cursor.loading_more()
    }
}

struct FeedState {
    phase: FeedPhase,
    recipes: Vec<Recipe>,
    error: Option<String>,
    total: Option<u64>,
    generation: u64,
    /// Generation of the request currently running, if any.
    in_flight: Option<u64>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            phase: FeedPhase::Idle,
            recipes: Vec::new(),
            error: None,
            total: None,
            generation: 0,
            in_flight: None,
        }
    }
}

/// The home feed state machine.
#[derive(Clone)]
pub struct BrowseService {
    state: SharedState,
    api: Arc<dyn RecipeApi>,
    feed: Arc<Mutex<FeedState>>,
    debouncer: SearchDebouncer,
    policy: RecoveryPolicy,
    page_size: u32,
}

impl BrowseService {
    pub fn new(state: SharedState, api: Arc<dyn RecipeApi>) -> Self {
        Self {
            state,
            api,
            feed: Arc::new(Mutex::new(FeedState::default())),
            debouncer: SearchDebouncer::default(),
            policy: RecoveryPolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_policy(mut self, policy: RecoveryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_debouncer(mut self, debouncer: SearchDebouncer) -> Self {
        self.debouncer = debouncer;
        self
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let feed = lock(&self.feed);
        let state = lock(&self.state);
        FeedSnapshot {
            phase: feed.phase,
            recipes: feed.recipes.clone(),
            error: feed.error.clone(),
            total: feed.total,
            cursor: state.pagination(),
            search: state.search().to_string(),
        }
    }

    pub fn show_load_more_control(&self) -> bool {
        self.snapshot().can_load_more()
    }

    /// Sets the search text and reloads page 1.
    pub async fn set_search(&self, text: impl Into<String>) -> LoadOutcome {
        lock(&self.state).set_search(text);
        self.reload().await
    }

    /// Sets the search text once typing has settled; superseded input is a no-op.
    pub async fn search_debounced(&self, text: impl Into<String>) -> LoadOutcome {
        match self.debouncer.settle(text.into()).await {
            Some(text) => self.set_search(text).await,
            None => LoadOutcome::Skipped,
        }
    }

    /// Overlays filter fields and reloads page 1.
    pub async fn apply_filters(&self, patch: FilterPatch) -> LoadOutcome {
        lock(&self.state).merge_filters(patch);
        self.reload().await
    }

    /// Clears all filters and reloads page 1.
    pub async fn reset_filters(&self) -> LoadOutcome {
        lock(&self.state).reset_filters();
        self.reload().await
    }

    /// Starts a fresh query for page 1, superseding anything in flight.
    pub async fn reload(&self) -> LoadOutcome {
        let (generation, query) = {
            let mut feed = lock(&self.feed);
            feed.generation += 1;
            let generation = feed.generation;
            feed.in_flight = Some(generation);
            feed.phase = FeedPhase::LoadingFirstPage;
            feed.recipes.clear();
            feed.error = None;
            feed.total = None;

            let mut state = lock(&self.state);
            state.reset_pagination();
            (generation, RecipeQuery::from_state(&state, 1, self.page_size))
        };
        debug!("Loading first page (generation {}) for {:?}", generation, query);

        let result = self.api.fetch_recipes(&query).await;
        self.finish_first_page(generation, result)
    }

    fn finish_first_page(&self, generation: u64, result: Result<RecipePage>) -> LoadOutcome {
        let mut feed = lock(&self.feed);
        if feed.generation != generation {
            debug!(
                "Discarding first page of generation {} (latest is {})",
                generation, feed.generation
            );
            return LoadOutcome::Stale;
        }
        feed.in_flight = None;
        let mut state = lock(&self.state);

        match result {
            Ok(page) => {
                info!(
                    "First page loaded: {} recipe(s), has more: {}",
                    page.recipes.len(),
                    page.has_more
                );
                feed.recipes = page.recipes;
                feed.total = Some(page.total);
                feed.phase = FeedPhase::Ready { degraded: false };
                state.pagination_mut().set_has_more(page.has_more);
                LoadOutcome::Applied
            }
            Err(e) => {
                error!("Failed to load recipes: {}", e);
                feed.error = Some(format!("Failed to load recipes: {}", e));
                feed.recipes = match self.policy {
                    RecoveryPolicy::UseBuiltInSample => sample_recipes(),
                    RecoveryPolicy::ShowEmpty => Vec::new(),
                };
                feed.total = None;
                feed.phase = FeedPhase::Ready { degraded: true };
                state.pagination_mut().set_has_more(false);
                LoadOutcome::Failed
            }
        }
    }

    /// Appends the next page if the feed is ready, has more and is idle.
    pub async fn load_more(&self) -> LoadOutcome {
        let (generation, query) = {
            let mut feed = lock(&self.feed);
            if feed.in_flight.is_some() || !matches!(feed.phase, FeedPhase::Ready { .. }) {
                debug!("Load more ignored: feed is busy ({})", feed.phase);
                return LoadOutcome::Skipped;
            }
            let mut state = lock(&self.state);
            let Some(next_page) = state.pagination_mut().begin_advance() else {
                debug!("Load more ignored: no further pages");
                return LoadOutcome::Skipped;
            };
            feed.in_flight = Some(feed.generation);
            (
                feed.generation,
                RecipeQuery::from_state(&state, next_page, self.page_size),
            )
        };
        debug!("Loading page {} (generation {})", query.page, generation);

        let result = self.api.fetch_recipes(&query).await;

        let mut feed = lock(&self.feed);
        if feed.generation != generation {
            debug!("Discarding page {} of generation {}", query.page, generation);
            return LoadOutcome::Stale;
        }
        feed.in_flight = None;
        let mut state = lock(&self.state);

        match result {
            Ok(page) => {
                info!(
                    "Page {} loaded: {} recipe(s), has more: {}",
                    query.page,
                    page.recipes.len(),
                    page.has_more
                );
                feed.recipes.extend(page.recipes);
                feed.total = Some(page.total);
                state
                    .pagination_mut()
                    .complete_advance(query.page, page.has_more);
                LoadOutcome::Applied
            }
            Err(e) => {
                warn!("Stopped loading more recipes after page {}: {}", query.page - 1, e);
                state.pagination_mut().halt();
                LoadOutcome::Failed
            }
        }
    }

    /// Attaches to the scroll observer; feed the result to [`drive`](Self::drive).
    pub fn subscribe(&self, observer: &ScrollObserver) -> Subscription {
        observer.subscribe()
    }

    /// Loads the next page for every signal until the subscription closes.
    ///
    /// Signals that arrive while a page is loading are dropped. The observer
    /// is re-armed after every attempt, so a sentinel that stays near fires
    /// again on the next observation.
    pub async fn drive(&self, subscription: Subscription, observer: ScrollObserver) {
        while subscription.next().await.is_some() {
            let outcome = self.load_more().await;
            let dropped = subscription.drain();
            if dropped > 0 {
                debug!("Dropped {} load-more signal(s) received mid-load", dropped);
            }
            debug!("Scroll-triggered load finished: {:?}", outcome);
            observer.rearm();
        }
        debug!("Scroll subscription closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryApi;
    use crate::services::scroll_observer::Viewport;
    use crate::state::AppState;
    use crate::storage::FavoritesStore;
    use futures::future::join;
    use std::time::Duration;

    fn catalog(n: usize) -> Vec<Recipe> {
        (1..=n)
            .map(|i| Recipe {
                id: i.to_string(),
                name: format!("Dish {}", i),
                cuisine: if i % 2 == 0 { "Thai" } else { "Italian" }.to_string(),
                cook_time: (i as u32) * 10,
                ..Default::default()
            })
            .collect()
    }

    fn service(api: Arc<MemoryApi>, page_size: u32) -> BrowseService {
        let state = AppState::new(FavoritesStore::in_memory()).into_shared();
        BrowseService::new(state, api).with_page_size(page_size)
    }

    fn ids(snapshot: &FeedSnapshot) -> Vec<String> {
        snapshot.recipes.iter().map(|r| r.id.clone()).collect()
    }

    #[async_std::test]
    async fn first_page_then_appended_pages() {
        let api = Arc::new(MemoryApi::new(catalog(5)));
        let browse = service(api.clone(), 2);
        assert_eq!(browse.snapshot().phase, FeedPhase::Idle);

        assert_eq!(browse.reload().await, LoadOutcome::Applied);
        let snap = browse.snapshot();
        assert_eq!(snap.phase, FeedPhase::Ready { degraded: false });
        assert_eq!(ids(&snap), ["1", "2"]);
        assert_eq!(snap.total, Some(5));
        assert!(snap.can_load_more());

        assert_eq!(browse.load_more().await, LoadOutcome::Applied);
        assert_eq!(browse.load_more().await, LoadOutcome::Applied);
        let snap = browse.snapshot();
        assert_eq!(ids(&snap), ["1", "2", "3", "4", "5"]);
        assert_eq!(snap.cursor.page(), 3);
        assert!(!snap.cursor.has_more());
        assert!(!snap.can_load_more());

        assert_eq!(browse.load_more().await, LoadOutcome::Skipped);
        assert_eq!(api.list_calls().len(), 3);
    }

    #[async_std::test]
    async fn load_more_before_first_page_is_ignored() {
        let api = Arc::new(MemoryApi::new(catalog(5)));
        let browse = service(api.clone(), 2);
        assert_eq!(browse.load_more().await, LoadOutcome::Skipped);
        assert!(api.list_calls().is_empty());
    }

    #[async_std::test]
    async fn load_more_while_loading_is_a_no_op() {
        let api = Arc::new(MemoryApi::new(catalog(6)));
        api.delay_search("", Duration::from_millis(40));
        let browse = service(api.clone(), 2);
        browse.reload().await;

        let (first, second) = join(browse.load_more(), async {
            async_std::task::sleep(Duration::from_millis(5)).await;
            browse.load_more().await
        })
        .await;

        assert_eq!(first, LoadOutcome::Applied);
        assert_eq!(second, LoadOutcome::Skipped);
        let snap = browse.snapshot();
        assert_eq!(snap.recipes.len(), 4);
        assert_eq!(snap.cursor.page(), 2);
        assert_eq!(api.list_calls().len(), 2);
    }

    #[async_std::test]
    async fn query_change_resets_list_and_cursor() {
        let api = Arc::new(MemoryApi::new(catalog(6)));
        let browse = service(api.clone(), 2);
        browse.reload().await;
        browse.load_more().await;
        assert_eq!(browse.snapshot().cursor.page(), 2);

        browse
            .apply_filters(FilterPatch::new().cuisine("Thai"))
            .await;
        let snap = browse.snapshot();
        assert_eq!(ids(&snap), ["2", "4"]);
        assert_eq!(snap.cursor.page(), 1);
        assert!(snap.cursor.has_more());

        let last = api.list_calls().pop().unwrap();
        assert_eq!(last.page, 1);
        assert_eq!(last.filters.cuisine.as_deref(), Some("Thai"));

        browse.reset_filters().await;
        assert_eq!(ids(&browse.snapshot()), ["1", "2"]);
    }

    #[async_std::test]
    async fn first_page_failure_falls_back_to_samples() {
        let api = Arc::new(MemoryApi::new(catalog(5)));
        api.fail_all(AppError::Network("connection refused".to_string()));
        let browse = service(api, 2);

        assert_eq!(browse.reload().await, LoadOutcome::Failed);
        let snap = browse.snapshot();
        assert_eq!(snap.phase, FeedPhase::Ready { degraded: true });
        assert_eq!(snap.recipes.len(), 3);
        assert!(snap.error.as_deref().unwrap().contains("connection refused"));
        assert!(!snap.cursor.has_more());
        assert_eq!(browse.load_more().await, LoadOutcome::Skipped);
    }

    #[async_std::test]
    async fn show_empty_policy_leaves_list_blank() {
        let api = Arc::new(MemoryApi::new(catalog(5)));
        api.fail_all(AppError::Request {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        });
        let browse = service(api, 2).with_policy(RecoveryPolicy::ShowEmpty);

        browse.reload().await;
        let snap = browse.snapshot();
        assert!(snap.recipes.is_empty());
        assert!(snap.error.is_some());
        assert!(!snap.cursor.has_more());
    }

    #[async_std::test]
    async fn later_page_failure_stops_loading_without_samples() {
        let api = Arc::new(MemoryApi::new(catalog(6)));
        api.fail_list_from_page(2, AppError::Network("reset".to_string()));
        let browse = service(api, 2);

        browse.reload().await;
        assert_eq!(browse.load_more().await, LoadOutcome::Failed);
        let snap = browse.snapshot();
        assert_eq!(ids(&snap), ["1", "2"]);
        assert_eq!(snap.error, None);
        assert_eq!(snap.phase, FeedPhase::Ready { degraded: false });
        assert!(!snap.cursor.has_more());
        assert!(!snap.cursor.loading_more());
        assert_eq!(snap.cursor.page(), 1);
    }

    #[async_std::test]
    async fn stale_response_is_discarded() {
        let api = Arc::new(MemoryApi::new(catalog(6)));
        api.delay_search("slow", Duration::from_millis(50));
        let browse = service(api.clone(), 10);

        let (slow, fast) = join(browse.set_search("slow"), async {
            async_std::task::sleep(Duration::from_millis(5)).await;
            browse.set_search("Thai").await
        })
        .await;

        assert_eq!(fast, LoadOutcome::Applied);
        assert_eq!(slow, LoadOutcome::Stale);
        let snap = browse.snapshot();
        assert_eq!(snap.search, "Thai");
        assert_eq!(ids(&snap), ["2", "4", "6"]);
        assert_eq!(snap.phase, FeedPhase::Ready { degraded: false });
    }

    #[async_std::test]
    async fn stale_page_append_is_discarded() {
        let api = Arc::new(MemoryApi::new(catalog(6)));
        let browse = service(api.clone(), 2);
        browse.reload().await;
        api.delay_search("", Duration::from_millis(40));

        let (more, _) = join(browse.load_more(), async {
            async_std::task::sleep(Duration::from_millis(5)).await;
            browse.set_search("Italian").await
        })
        .await;

        assert_eq!(more, LoadOutcome::Stale);
        let snap = browse.snapshot();
        assert_eq!(ids(&snap), ["1", "3"]);
        assert_eq!(snap.cursor.page(), 1);
    }

    #[async_std::test]
    async fn debounced_search_applies_only_the_settled_text() {
        let api = Arc::new(MemoryApi::new(catalog(4)));
        let browse = service(api.clone(), 10)
            .with_debouncer(SearchDebouncer::new(Duration::from_millis(20)));

        let (first, second) = join(browse.search_debounced("Ita"), async {
            async_std::task::sleep(Duration::from_millis(5)).await;
            browse.search_debounced("Thai").await
        })
        .await;

        assert_eq!(first, LoadOutcome::Skipped);
        assert_eq!(second, LoadOutcome::Applied);
        assert_eq!(api.list_calls().len(), 1);
        assert_eq!(browse.snapshot().search, "Thai");
    }

    #[async_std::test]
    async fn scroll_signals_drive_page_loads() {
        let api = Arc::new(MemoryApi::new(catalog(4)));
        let browse = service(api.clone(), 2);
        browse.reload().await;

        let observer = ScrollObserver::new(100.0);
        let subscription = browse.subscribe(&observer);
        let driver = async_std::task::spawn({
            let browse = browse.clone();
            let observer = observer.clone();
            async move { browse.drive(subscription, observer).await }
        });

        assert!(observer.trigger());
        for _ in 0..50 {
            if browse.snapshot().recipes.len() == 4 {
                break;
            }
            async_std::task::sleep(Duration::from_millis(2)).await;
        }
        assert_eq!(browse.snapshot().recipes.len(), 4);

        driver.cancel().await;
        assert_eq!(observer.subscriber_count(), 0);
    }

    #[async_std::test]
    async fn signal_during_first_page_does_not_block_later_scrolling() {
        let api = Arc::new(MemoryApi::new(catalog(3)));
        api.delay_search("", Duration::from_millis(40));
        let browse = service(api.clone(), 1);

        let observer = ScrollObserver::new(100.0);
        let subscription = browse.subscribe(&observer);
        let driver = async_std::task::spawn({
            let browse = browse.clone();
            let observer = observer.clone();
            async move { browse.drive(subscription, observer).await }
        });
        let near = Viewport {
            scroll_top: 0.0,
            viewport_height: 500.0,
            sentinel_top: 550.0,
        };

        let (first, fired_during_load) = join(browse.reload(), async {
            async_std::task::sleep(Duration::from_millis(5)).await;
            observer.observe(near)
        })
        .await;
        assert_eq!(first, LoadOutcome::Applied);
        assert!(fired_during_load);
        let snap = browse.snapshot();
        assert_eq!(snap.recipes.len(), 1);
        assert!(snap.cursor.has_more());

        assert!(observer.observe(near));
        for _ in 0..100 {
            if browse.snapshot().recipes.len() == 2 {
                break;
            }
            async_std::task::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(browse.snapshot().recipes.len(), 2);

        driver.cancel().await;
    }

    #[test]
    fn recovery_policy_parses() {
        assert_eq!(
            "sample".parse::<RecoveryPolicy>().unwrap(),
            RecoveryPolicy::UseBuiltInSample
        );
        assert_eq!(
            " Empty ".parse::<RecoveryPolicy>().unwrap(),
            RecoveryPolicy::ShowEmpty
        );
        assert!("retry".parse::<RecoveryPolicy>().is_err());
    }
}
