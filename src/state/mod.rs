//! State management for the recipe browser.

use crate::storage::FavoritesStore;
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub mod favorites;
pub mod filters;
pub mod pagination;

pub use favorites::FavoriteSet;
pub use filters::{FilterPatch, FilterSelection};
pub use pagination::PaginationCursor;

/// Session-wide state shared by the views.
pub type SharedState = Arc<Mutex<AppState>>;

/// Locks a mutex, recovering the data if a previous holder panicked.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Application-wide state container: query, favorites and page cursor.
///
/// Every change to the query (search text or filters) resets the cursor.
pub struct AppState {
    search: String,
    filters: FilterSelection,
    favorites: FavoriteSet,
    pagination: PaginationCursor,
}

impl AppState {
    /// Creates the state, loading favorites from `store`.
    pub fn new(store: FavoritesStore) -> Self {
        Self {
            search: String::new(),
            filters: FilterSelection::default(),
            favorites: FavoriteSet::load(store),
            pagination: PaginationCursor::new(),
        }
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(Mutex::new(self))
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        debug!("Search text set to {:?}", self.search);
        self.pagination.reset();
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    /// Overlays the provided filter fields and resets the cursor.
    pub fn merge_filters(&mut self, patch: FilterPatch) {
        self.filters.merge(patch);
        debug!("Filters now {:?}", self.filters);
        self.pagination.reset();
    }

    /// Clears every filter back to "all" and resets the cursor.
    pub fn reset_filters(&mut self) {
        self.filters = FilterSelection::default();
        self.pagination.reset();
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn add_favorite(&mut self, id: &str) -> bool {
        self.favorites.add(id)
    }

    pub fn remove_favorite(&mut self, id: &str) -> bool {
        self.favorites.remove(id)
    }

    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        self.favorites.toggle(id)
    }

    pub fn pagination(&self) -> PaginationCursor {
        self.pagination
    }

    pub fn pagination_mut(&mut self) -> &mut PaginationCursor {
        &mut self.pagination
    }

    pub fn reset_pagination(&mut self) {
        self.pagination.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advanced_state() -> AppState {
        let mut state = AppState::new(FavoritesStore::in_memory());
        let cursor = state.pagination_mut();
        let next = cursor.begin_advance().unwrap();
        cursor.complete_advance(next, true);
        cursor.begin_advance();
        assert_ne!(state.pagination(), PaginationCursor::default());
        state
    }

    #[test]
    fn every_query_mutation_resets_the_cursor() {
        let mutations: [(&str, fn(&mut AppState)); 6] = [
            ("search", |s: &mut AppState| s.set_search("curry")),
            ("clear search", |s: &mut AppState| s.set_search("")),
            (
                "merge cuisine",
                |s: &mut AppState| s.merge_filters(FilterPatch::new().cuisine("Thai")),
            ),
            (
                "merge max time",
                |s: &mut AppState| s.merge_filters(FilterPatch::new().max_time(Some(30))),
            ),
            ("empty merge", |s: &mut AppState| s.merge_filters(FilterPatch::new())),
            ("reset filters", |s: &mut AppState| s.reset_filters()),
        ];

        for (name, mutate) in mutations {
            let mut state = advanced_state();
            mutate(&mut state);
            let cursor = state.pagination();
            assert_eq!(
                (cursor.page(), cursor.has_more(), cursor.loading_more()),
                (1, true, false),
                "{} did not reset pagination",
                name
            );
        }
    }

    #[test]
    fn favorites_mutations_do_not_touch_the_cursor() {
        let mut state = advanced_state();
        let before = state.pagination();
        state.toggle_favorite("1");
        assert!(state.is_favorite("1"));
        assert_eq!(state.pagination(), before);
    }

    #[test]
    fn reset_filters_clears_everything() {
        let mut state = AppState::new(FavoritesStore::in_memory());
        state.merge_filters(FilterPatch::new().cuisine("Thai").diet("Vegan"));
        state.reset_filters();
        assert!(state.filters().is_empty());
    }
}
