//! Session construction and teardown.
//!
//! A [`Session`] owns everything one browsing session needs: the shared
//! state, the API, the services and the auto-load subscription. It is created
//! once at startup and closed on exit.

use crate::api::{ApiClient, MemoryApi, RecipeApi};
use crate::config::AppConfig;
use crate::error::Result;
use crate::samples::sample_recipes;
use crate::services::{
    BrowseService, FavoritesView, LoadOutcome, RecipeDetailService, ScrollObserver,
};
use crate::state::{AppState, SharedState, lock};
use crate::storage::{FavoritesStore, FileStore};
use async_std::task::JoinHandle;
use log::info;
use std::sync::Arc;
use std::time::Duration;

const LOAD_MORE_POLL: Duration = Duration::from_millis(5);

/// Options taken from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupOptions {
    /// Serve recipes from the built-in catalog instead of the API.
    pub offline: bool,
    /// Search text to open the feed with.
    pub initial_search: Option<String>,
}

/// Reads `--offline` and a positional search text; other flags are ignored.
pub fn startup_options_from_args<I>(args: I) -> StartupOptions
where
    I: IntoIterator<Item = String>,
{
    let mut options = StartupOptions::default();
    let mut words = Vec::new();
    for arg in args {
        if arg == "--offline" {
            options.offline = true;
        } else if !arg.starts_with('-') {
            words.push(arg);
        }
    }
    if !words.is_empty() {
        options.initial_search = Some(words.join(" "));
    }
    options
}

/// One browsing session.
pub struct Session {
    state: SharedState,
    api: Arc<dyn RecipeApi>,
    browse: BrowseService,
    details: RecipeDetailService,
    observer: ScrollObserver,
    auto_load: Option<JoinHandle<()>>,
}

impl Session {
    /// Opens a session against the configured API with favorites on disk.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let api: Arc<dyn RecipeApi> = Arc::new(ApiClient::new(&config.api));
        Ok(Self::with_parts(config, api, Self::file_favorites(config)?))
    }

    /// Opens a session served from the built-in catalog, favorites on disk.
    pub fn offline(config: &AppConfig) -> Result<Self> {
        info!("Offline mode: serving built-in recipes");
        let api: Arc<dyn RecipeApi> = Arc::new(MemoryApi::new(sample_recipes()));
        Ok(Self::with_parts(config, api, Self::file_favorites(config)?))
    }

    fn file_favorites(config: &AppConfig) -> Result<FavoritesStore> {
        let data_dir = config.resolve_data_dir()?;
        info!("Storage dir: {}", data_dir.display());
        Ok(FavoritesStore::new(Arc::new(FileStore::new(data_dir))))
    }

    /// Assembles a session from explicit parts.
    pub fn with_parts(config: &AppConfig, api: Arc<dyn RecipeApi>, store: FavoritesStore) -> Self {
        let state = AppState::new(store).into_shared();
        let browse = BrowseService::new(state.clone(), api.clone())
            .with_policy(config.recovery)
            .with_page_size(config.page_size);
        let details = RecipeDetailService::new(api.clone());
        Self {
            state,
            api,
            browse,
            details,
            observer: ScrollObserver::default(),
            auto_load: None,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn api(&self) -> &dyn RecipeApi {
        self.api.as_ref()
    }

    pub fn browse(&self) -> &BrowseService {
        &self.browse
    }

    pub fn details(&self) -> &RecipeDetailService {
        &self.details
    }

    pub fn observer(&self) -> &ScrollObserver {
        &self.observer
    }

    /// Subscribes the feed to the scroll observer. Calling it twice is a no-op.
    pub fn start_auto_load(&mut self) {
        if self.auto_load.is_some() {
            return;
        }
        let subscription = self.browse.subscribe(&self.observer);
        let browse = self.browse.clone();
        let observer = self.observer.clone();
        self.auto_load = Some(async_std::task::spawn(async move {
            browse.drive(subscription, observer).await
        }));
    }

    pub fn auto_load_active(&self) -> bool {
        self.auto_load.is_some()
    }

    /// Requests the next page the way reaching the end of the list does and
    /// waits for it to land. Without a running driver the page loads inline.
    pub async fn load_more(&self) -> LoadOutcome {
        if self.auto_load.is_none() {
            return self.browse.load_more().await;
        }
        let before = self.browse.snapshot();
        if !before.can_load_more() {
            return LoadOutcome::Skipped;
        }
        if !self.observer.trigger() {
            return self.browse.load_more().await;
        }
        loop {
            async_std::task::sleep(LOAD_MORE_POLL).await;
            let now = self.browse.snapshot();
            if now.cursor.loading_more() {
                continue;
            }
            if now.cursor.page() != before.cursor.page() {
                return LoadOutcome::Applied;
            }
            if !now.cursor.has_more() {
                return LoadOutcome::Failed;
            }
        }
    }

    /// Opens the favorites view with a fresh bulk fetch.
    pub async fn favorites_view(&self) -> FavoritesView {
        FavoritesView::load(self.state.clone(), self.api.as_ref()).await
    }

    /// Stops auto-loading and writes favorites back one last time.
    pub async fn close(mut self) {
        if let Some(handle) = self.auto_load.take() {
            handle.cancel().await;
        }
        lock(&self.state).favorites().persist();
        info!("Session closed");
    }
}
