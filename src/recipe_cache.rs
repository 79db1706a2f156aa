//! Recipe detail cache for fast re-opening.
//!
//! Keeps recently viewed or listed recipes keyed by id using an LRU policy,
//! so opening a recipe seen moments ago does not hit the network again.

use crate::models::Recipe;
use lru::LruCache;
use std::num::NonZeroUsize;

/// LRU cache of recipe details.
pub struct RecipeCache {
    cache: LruCache<String, Recipe>,
}

impl RecipeCache {
    /// Creates a cache holding up to `capacity` recipes (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Retrieves a recipe from the cache if it exists.
    pub fn get(&mut self, id: &str) -> Option<Recipe> {
        let result = self.cache.get(id).cloned();
        if result.is_some() {
            log::info!("Cache HIT: recipe {}", id);
        } else {
            log::info!("Cache MISS: recipe {}", id);
        }
        result
    }

    /// Stores a recipe under its id.
    pub fn put(&mut self, recipe: Recipe) {
        log::debug!("Cache PUT: recipe {} ({})", recipe.id, recipe.name);
        self.cache.put(recipe.id.clone(), recipe);
    }

    /// Stores recipes without disturbing entries that are already cached.
    pub fn prime<'a>(&mut self, recipes: impl IntoIterator<Item = &'a Recipe>) {
        for recipe in recipes {
            if !self.cache.contains(recipe.id.as_str()) {
                self.cache.put(recipe.id.clone(), recipe.clone());
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cache.contains(id)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: format!("Recipe {}", id),
            ..Default::default()
        }
    }

    #[test]
    fn least_recently_used_entry_is_evicted() {
        let mut cache = RecipeCache::new(2);
        cache.put(recipe("1"));
        cache.put(recipe("2"));
        assert!(cache.get("1").is_some());
        cache.put(recipe("3"));

        assert!(cache.contains("1"));
        assert!(!cache.contains("2"));
        assert!(cache.contains("3"));
    }

    #[test]
    fn prime_keeps_existing_entries() {
        let mut cache = RecipeCache::new(4);
        let mut detailed = recipe("1");
        detailed.notes = "full detail".to_string();
        cache.put(detailed);

        cache.prime(&[recipe("1"), recipe("2")]);
        assert_eq!(cache.get("1").unwrap().notes, "full detail");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_still_holds_one() {
        let mut cache = RecipeCache::new(0);
        cache.put(recipe("1"));
        assert!(!cache.is_empty());
    }
}
