//! Recipe API boundary.
//!
//! Services talk to the backend only through [`RecipeApi`]; [`ApiClient`] is
//! the HTTP implementation and [`MemoryApi`] answers from a local catalog.

pub mod client;
pub mod memory;
pub mod normalize;

use crate::error::Result;
use crate::models::{Category, Recipe, RecipePage};
use crate::state::{AppState, FilterSelection};
use async_trait::async_trait;

pub use client::ApiClient;
pub use memory::MemoryApi;

/// Parameters of one list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeQuery {
    pub search: String,
    pub filters: FilterSelection,
    pub page: u32,
    pub page_size: u32,
}

impl RecipeQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            search: String::new(),
            filters: FilterSelection::default(),
            page,
            page_size,
        }
    }

    /// Captures the current search text and filters.
    pub fn from_state(state: &AppState, page: u32, page_size: u32) -> Self {
        Self {
            search: state.search().to_string(),
            filters: state.filters().clone(),
            page,
            page_size,
        }
    }

    /// Query-string pairs: non-empty search and filters, then page and size.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_string()));
        }
        if let Some(cuisine) = self.filters.cuisine.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("cuisine", cuisine.to_string()));
        }
        if let Some(diet) = self.filters.diet.as_deref().filter(|d| !d.is_empty()) {
            pairs.push(("diet", diet.to_string()));
        }
        if let Some(max_time) = self.filters.max_time {
            pairs.push(("maxTime", max_time.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("pageSize", self.page_size.to_string()));
        pairs
    }
}

#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Fetches one page of recipes matching the query.
    async fn fetch_recipes(&self, query: &RecipeQuery) -> Result<RecipePage>;

    /// Fetches a single recipe by id.
    async fn fetch_recipe(&self, id: &str) -> Result<Recipe>;

    async fn fetch_featured(&self) -> Result<Vec<Recipe>>;

    async fn fetch_categories(&self) -> Result<Vec<Category>>;

    /// Posts a JSON body to `endpoint` (relative to the API base).
    async fn post_json(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FilterPatch;
    use crate::storage::FavoritesStore;

    #[test]
    fn only_non_empty_filters_become_parameters() {
        let query = RecipeQuery::new(1, 12);
        assert_eq!(
            query.to_query_pairs(),
            vec![("page", "1".to_string()), ("pageSize", "12".to_string())]
        );
    }

    #[test]
    fn query_captures_state() {
        let mut state = AppState::new(FavoritesStore::in_memory());
        state.set_search(" curry ");
        state.merge_filters(
            FilterPatch::new()
                .cuisine("Thai")
                .diet("all")
                .max_time(Some(45)),
        );

        let query = RecipeQuery::from_state(&state, 3, 12);
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("search", "curry".to_string()),
                ("cuisine", "Thai".to_string()),
                ("maxTime", "45".to_string()),
                ("page", "3".to_string()),
                ("pageSize", "12".to_string()),
            ]
        );
    }
}
