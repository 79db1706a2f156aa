//! Service for opening a single recipe.
//!
//! Coordinates the recipe cache and the API: cached recipes open without a
//! request, failures become a "not found" view, and the supplementary
//! featured list never surfaces an error.

use crate::api::RecipeApi;
use crate::config::DETAIL_CACHE_CAPACITY;
use crate::models::Recipe;
use crate::recipe_cache::RecipeCache;
use crate::state::lock;
use log::{debug, warn};
use std::sync::{Arc, Mutex};

/// What the detail view shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    Loaded(Recipe),
    /// The recipe could not be loaded; the view offers a way back.
    NotFound { id: String, message: String },
}

/// Service for loading recipe details.
#[derive(Clone)]
pub struct RecipeDetailService {
    api: Arc<dyn RecipeApi>,
    cache: Arc<Mutex<RecipeCache>>,
}

impl RecipeDetailService {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self::with_capacity(api, DETAIL_CACHE_CAPACITY)
    }

    pub fn with_capacity(api: Arc<dyn RecipeApi>, capacity: usize) -> Self {
        Self {
            api,
            cache: Arc::new(Mutex::new(RecipeCache::new(capacity))),
        }
    }

    /// Opens a recipe, from cache when possible.
    pub async fn open(&self, id: &str) -> DetailView {
        let cached = lock(&self.cache).get(id);
        if let Some(recipe) = cached {
            return DetailView::Loaded(recipe);
        }

        match self.api.fetch_recipe(id).await {
            Ok(recipe) => {
                lock(&self.cache).put(recipe.clone());
                DetailView::Loaded(recipe)
            }
            Err(e) => {
                warn!("Failed to load recipe {}: {}", id, e);
                let message = if e.is_not_found() {
                    "Recipe not found".to_string()
                } else {
                    format!("Recipe could not be loaded: {}", e)
                };
                DetailView::NotFound {
                    id: id.to_string(),
                    message,
                }
            }
        }
    }

    /// Featured recipes; any failure yields an empty list.
    pub async fn featured(&self) -> Vec<Recipe> {
        match self.api.fetch_featured().await {
            Ok(recipes) => {
                lock(&self.cache).prime(&recipes);
                recipes
            }
            Err(e) => {
                debug!("Featured recipes unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// Seeds the cache with recipes already shown in a list.
    pub fn prime(&self, recipes: &[Recipe]) {
        lock(&self.cache).prime(recipes);
    }
}
