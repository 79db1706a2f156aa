//! In-process [`RecipeApi`] over a fixed catalog.
//!
//! Serves the offline mode of the terminal front end and stands in for the
//! backend in tests: list requests are filtered and paginated locally, and
//! failures or per-search delays can be injected.

use super::{RecipeApi, RecipeQuery};
use crate::error::{AppError, Result};
use crate::filtering::matches_query;
use crate::models::{Category, Recipe, RecipePage};
use crate::state::lock;
use async_trait::async_trait;
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct Faults {
    all: Option<AppError>,
    list_from_page: Option<(u32, AppError)>,
    delays: HashMap<String, Duration>,
}

/// Backend double that answers from memory.
pub struct MemoryApi {
    catalog: Vec<Recipe>,
    faults: Mutex<Faults>,
    calls: Mutex<Vec<RecipeQuery>>,
}

impl MemoryApi {
    pub fn new(catalog: Vec<Recipe>) -> Self {
        Self {
            catalog,
            faults: Mutex::new(Faults::default()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Makes every request fail with `error`.
    pub fn fail_all(&self, error: AppError) {
        lock(&self.faults).all = Some(error);
    }

    /// Makes list requests for `page` and later fail with `error`.
    pub fn fail_list_from_page(&self, page: u32, error: AppError) {
        lock(&self.faults).list_from_page = Some((page, error));
    }

    pub fn clear_failures(&self) {
        let mut faults = lock(&self.faults);
        faults.all = None;
        faults.list_from_page = None;
    }

    /// Delays list responses for the given search text.
    pub fn delay_search(&self, search: &str, delay: Duration) {
        lock(&self.faults).delays.insert(search.to_string(), delay);
    }

    /// Every list query received so far, in arrival order.
    pub fn list_calls(&self) -> Vec<RecipeQuery> {
        lock(&self.calls).clone()
    }

    fn check_all(&self) -> Result<()> {
        match &lock(&self.faults).all {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn not_found() -> AppError {
        AppError::Request {
            status: 404,
            status_text: "Not Found".to_string(),
        }
    }
}

#[async_trait]
impl RecipeApi for MemoryApi {
    async fn fetch_recipes(&self, query: &RecipeQuery) -> Result<RecipePage> {
        lock(&self.calls).push(query.clone());
        let delay = lock(&self.faults).delays.get(query.search.trim()).copied();
        if let Some(delay) = delay {
            async_std::task::sleep(delay).await;
        }

        self.check_all()?;
        if let Some((from, error)) = &lock(&self.faults).list_from_page {
            if query.page >= *from {
                return Err(error.clone());
            }
        }

        let matching: Vec<&Recipe> = self
            .catalog
            .iter()
            .filter(|r| matches_query(r, &query.search, &query.filters))
            .collect();
        let size = query.page_size.max(1) as usize;
        let start = (query.page.max(1) as usize - 1).saturating_mul(size);
        let recipes: Vec<Recipe> = matching
            .iter()
            .skip(start)
            .take(size)
            .map(|r| (*r).clone())
            .collect();
        let has_more = start + recipes.len() < matching.len();
        debug!(
            "Memory API page {} -> {} of {} match(es)",
            query.page,
            recipes.len(),
            matching.len()
        );

        Ok(RecipePage {
            recipes,
            total: matching.len() as u64,
            has_more,
            page: query.page,
        })
    }

    async fn fetch_recipe(&self, id: &str) -> Result<Recipe> {
        self.check_all()?;
        self.catalog
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn fetch_featured(&self) -> Result<Vec<Recipe>> {
        self.check_all()?;
        Ok(self.catalog.iter().take(3).cloned().collect())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        self.check_all()?;
        let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
        for recipe in self.catalog.iter().filter(|r| !r.cuisine.is_empty()) {
            *counts.entry(recipe.cuisine.as_str()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(name, count)| Category {
                id: Some(name.to_lowercase()),
                name: name.to_string(),
                count: Some(count),
            })
            .collect())
    }

    async fn post_json(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        self.check_all()?;
        Ok(serde_json::json!({ "endpoint": endpoint, "received": body }))
    }
}
