//! Favorites view: client-side filtering of a bulk-fetched catalog.
//!
//! There is no server-side favorites query. The view fetches one large page
//! of recipes when opened and derives the visible subset from the favorites
//! set, the search text and the filters every time it is asked.

use crate::api::{RecipeApi, RecipeQuery};
use crate::config::FAVORITES_BULK_PAGE_SIZE;
use crate::filtering::matches_query;
use crate::models::Recipe;
use crate::samples::sample_recipes;
use crate::state::{FavoriteSet, FilterSelection, SharedState, lock};
use log::{info, warn};

/// Where the catalog behind the view came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Remote,
    BuiltInSample,
}

/// Favorites view over a catalog fetched once.
pub struct FavoritesView {
    state: SharedState,
    catalog: Vec<Recipe>,
    source: CatalogSource,
    error: Option<String>,
}

impl FavoritesView {
    /// Bulk-fetches the catalog, falling back to the built-in samples.
    pub async fn load(state: SharedState, api: &dyn RecipeApi) -> Self {
        let query = RecipeQuery::new(1, FAVORITES_BULK_PAGE_SIZE);
        match api.fetch_recipes(&query).await {
            Ok(page) => {
                info!("Favorites catalog loaded: {} recipe(s)", page.recipes.len());
                Self::with_catalog(state, page.recipes, CatalogSource::Remote)
            }
            Err(e) => {
                warn!("Failed to load favorites catalog, using samples: {}", e);
                let mut view =
                    Self::with_catalog(state, sample_recipes(), CatalogSource::BuiltInSample);
                view.error = Some(format!("Failed to load recipes: {}", e));
                view
            }
        }
    }

    pub fn with_catalog(state: SharedState, catalog: Vec<Recipe>, source: CatalogSource) -> Self {
        Self {
            state,
            catalog,
            source,
            error: None,
        }
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn catalog(&self) -> &[Recipe] {
        &self.catalog
    }

    /// Favorites matching the current search text and filters.
    pub fn visible(&self) -> Vec<Recipe> {
        let state = lock(&self.state);
        filter_favorites(
            &self.catalog,
            state.favorites(),
            state.search(),
            state.filters(),
        )
    }
}

/// Recipes whose id is a favorite and that match search text and filters,
/// in catalog order.
pub fn filter_favorites(
    recipes: &[Recipe],
    favorites: &FavoriteSet,
    search: &str,
    filters: &FilterSelection,
) -> Vec<Recipe> {
    recipes
        .iter()
        .filter(|r| favorites.contains(&r.id))
        .filter(|r| matches_query(r, search, filters))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryApi;
    use crate::error::AppError;
    use crate::state::{AppState, FilterPatch};
    use crate::storage::FavoritesStore;

    fn recipe(id: &str, cuisine: &str, cook_time: u32) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: format!("{} dish", cuisine),
            cuisine: cuisine.to_string(),
            cook_time,
            ..Default::default()
        }
    }

    fn favorites(ids: &[&str]) -> FavoriteSet {
        let mut set = FavoriteSet::load(FavoritesStore::in_memory());
        for id in ids {
            set.add(id);
        }
        set
    }

    #[test]
    fn max_time_narrows_favorites() {
        let recipes = vec![recipe("1", "Italian", 30), recipe("2", "Thai", 60)];
        let mut filters = FilterSelection::default();
        filters.merge(FilterPatch::new().max_time_str("45").unwrap());
        let visible = filter_favorites(&recipes, &favorites(&["1", "2"]), "", &filters);
        let ids: Vec<_> = visible.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1"]);
    }

    #[test]
    fn non_favorites_are_hidden() {
        let recipes = vec![recipe("1", "Italian", 30), recipe("2", "Thai", 60)];
        let visible = filter_favorites(
            &recipes,
            &favorites(&["2"]),
            "",
            &FilterSelection::default(),
        );
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "2");
    }

    #[test]
    fn recomputation_is_deterministic() {
        let recipes = vec![recipe("1", "Italian", 30), recipe("2", "Thai", 60)];
        let favs = favorites(&["1", "2"]);
        let filters = FilterSelection {
            cuisine: Some("thai".to_string()),
            ..Default::default()
        };
        let first = filter_favorites(&recipes, &favs, "dish", &filters);
        let second = filter_favorites(&recipes, &favs, "dish", &filters);
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[async_std::test]
    async fn view_tracks_state_changes() {
        let state = AppState::new(FavoritesStore::in_memory()).into_shared();
        let api = MemoryApi::new(vec![recipe("1", "Italian", 30), recipe("2", "Thai", 60)]);
        let view = FavoritesView::load(state.clone(), &api).await;
        assert_eq!(view.source(), CatalogSource::Remote);
        assert!(view.visible().is_empty());

        lock(&state).add_favorite("1");
        lock(&state).add_favorite("2");
        assert_eq!(view.visible().len(), 2);

        lock(&state).merge_filters(FilterPatch::new().cuisine("Italian"));
        assert_eq!(view.visible()[0].id, "1");
        assert_eq!(view.visible().len(), 1);
    }

    #[async_std::test]
    async fn failed_bulk_fetch_uses_samples() {
        let state = AppState::new(FavoritesStore::in_memory()).into_shared();
        let api = MemoryApi::new(Vec::new());
        api.fail_all(AppError::Network("offline".to_string()));

        let view = FavoritesView::load(state.clone(), &api).await;
        assert_eq!(view.source(), CatalogSource::BuiltInSample);
        assert_eq!(view.catalog().len(), 3);
        assert!(view.error().is_some());

        lock(&state).add_favorite("2");
        assert_eq!(view.visible().len(), 1);
    }
}
