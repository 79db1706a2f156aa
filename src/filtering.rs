//! Client-side recipe matching against search text and filters.

use crate::models::Recipe;
use crate::state::FilterSelection;

/// Case-insensitive substring match on name, cuisine and joined ingredients.
/// Blank search text matches everything.
pub fn matches_search(recipe: &Recipe, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    recipe.name.to_lowercase().contains(&needle)
        || recipe.cuisine.to_lowercase().contains(&needle)
        || recipe.ingredients.join(" ").to_lowercase().contains(&needle)
}

/// Exact case-insensitive cuisine and diet, inclusive cook-time ceiling.
pub fn matches_filters(recipe: &Recipe, filters: &FilterSelection) -> bool {
    let cuisine_ok = filters
        .cuisine
        .as_deref()
        .is_none_or(|c| recipe.cuisine.eq_ignore_ascii_case(c));
    let diet_ok = filters
        .diet
        .as_deref()
        .is_none_or(|d| recipe.diet.eq_ignore_ascii_case(d));
    let time_ok = filters.max_time.is_none_or(|max| recipe.cook_time <= max);
    cuisine_ok && diet_ok && time_ok
}

pub fn matches_query(recipe: &Recipe, search: &str, filters: &FilterSelection) -> bool {
    matches_search(recipe, search) && matches_filters(recipe, filters)
}
