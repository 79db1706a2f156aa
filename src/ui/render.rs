//! Plain-text rendering of the views.
//!
//! Each function turns one view into the text block printed by the REPL.

use crate::models::{Category, Recipe};
use crate::services::{CatalogSource, DetailView, FeedPhase, FeedSnapshot};
use crate::state::{FavoriteSet, FilterSelection};
use std::fmt::Write;

/// One list row: favorite marker, id, name and a short summary.
pub fn recipe_line(recipe: &Recipe, favorite: bool) -> String {
    let marker = if favorite { '*' } else { ' ' };
    let mut line = format!("{} [{}] {}", marker, recipe.id, recipe.name);
    let mut details = Vec::new();
    if !recipe.cuisine.is_empty() {
        details.push(recipe.cuisine.clone());
    }
    if !recipe.diet.is_empty() {
        details.push(recipe.diet.clone());
    }
    if recipe.cook_time > 0 {
        details.push(format!("{} min", recipe.cook_time));
    }
    if !details.is_empty() {
        let _ = write!(line, " ({})", details.join(", "));
    }
    line
}

/// Describes the active search text and filters, or `None` when there are none.
pub fn query_summary(search: &str, filters: &FilterSelection) -> Option<String> {
    let mut parts = Vec::new();
    if !search.trim().is_empty() {
        parts.push(format!("search \"{}\"", search.trim()));
    }
    if let Some(cuisine) = &filters.cuisine {
        parts.push(format!("cuisine {}", cuisine));
    }
    if let Some(diet) = &filters.diet {
        parts.push(format!("diet {}", diet));
    }
    if let Some(max_time) = filters.max_time {
        parts.push(format!("max {} min", max_time));
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// The home feed with its error banner and load-more hint.
pub fn render_feed(
    snapshot: &FeedSnapshot,
    favorites: &FavoriteSet,
    filters: &FilterSelection,
) -> String {
    let mut out = String::new();
    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "! {}", error);
    }
    if let Some(summary) = query_summary(&snapshot.search, filters) {
        let _ = writeln!(out, "Showing {}", summary);
    }

    match snapshot.phase {
        FeedPhase::Idle => out.push_str("Nothing loaded yet. Type `list` to load recipes.\n"),
        FeedPhase::LoadingFirstPage => out.push_str("Loading recipes...\n"),
        FeedPhase::Ready { .. } if snapshot.recipes.is_empty() => {
            out.push_str("No recipes found.\n")
        }
        FeedPhase::Ready { .. } => {
            for recipe in &snapshot.recipes {
                let _ = writeln!(out, "{}", recipe_line(recipe, favorites.contains(&recipe.id)));
            }
            match snapshot.total {
                Some(total) => {
                    let _ = writeln!(out, "{} of {} recipe(s)", snapshot.recipes.len(), total);
                }
                None => {
                    let _ = writeln!(out, "{} recipe(s)", snapshot.recipes.len());
                }
            }
        }
    }

    if snapshot.cursor.loading_more() {
        out.push_str("Loading more...\n");
    } else if snapshot.can_load_more() {
        out.push_str("Type `more` to load more recipes.\n");
    }
    out
}

/// The detail view, or the not-found view with a way back.
pub fn render_detail(view: &DetailView, favorite: bool) -> String {
    let recipe = match view {
        DetailView::Loaded(recipe) => recipe,
        DetailView::NotFound { id, message } => {
            return format!("{} (id {})\nType `list` to go back.\n", message, id);
        }
    };

    let mut out = String::new();
    let star = if favorite { " *" } else { "" };
    let _ = writeln!(out, "{}{}", recipe.name, star);
    if let Some(description) = recipe.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "{}", description);
    }

    let facts = [
        ("Cuisine", recipe.cuisine.clone()),
        ("Diet", recipe.diet.clone()),
        (
            "Cook time",
            (recipe.cook_time > 0)
                .then(|| format!("{} min", recipe.cook_time))
                .unwrap_or_default(),
        ),
        ("Difficulty", recipe.difficulty.clone()),
        (
            "Servings",
            (recipe.servings > 0)
                .then(|| recipe.servings.to_string())
                .unwrap_or_default(),
        ),
    ];
    for (label, value) in facts.iter().filter(|(_, v)| !v.is_empty()) {
        let _ = writeln!(out, "{}: {}", label, value);
    }
    if !recipe.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", recipe.tags.join(", "));
    }

    if !recipe.ingredients.is_empty() {
        out.push_str("\nIngredients:\n");
        for ingredient in &recipe.ingredients {
            let _ = writeln!(out, "  - {}", ingredient);
        }
    }
    if !recipe.instructions.is_empty() {
        out.push_str("\nInstructions:\n");
        for (step, instruction) in recipe.instructions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", step + 1, instruction);
        }
    }
    if !recipe.notes.is_empty() {
        let _ = writeln!(out, "\nNotes: {}", recipe.notes);
    }
    out
}

/// The favorites view: visible favorites plus any catalog error.
pub fn render_favorites(visible: &[Recipe], source: CatalogSource, error: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(error) = error {
        let _ = writeln!(out, "! {}", error);
    }
    if source == CatalogSource::BuiltInSample {
        out.push_str("(showing built-in recipes)\n");
    }
    if visible.is_empty() {
        out.push_str("No favorite recipes match. Use `fav <id>` to add one.\n");
    } else {
        for recipe in visible {
            let _ = writeln!(out, "{}", recipe_line(recipe, true));
        }
    }
    out
}

pub fn render_featured(recipes: &[Recipe], favorites: &FavoriteSet) -> String {
    if recipes.is_empty() {
        return "No featured recipes right now.\n".to_string();
    }
    let mut out = String::from("Featured:\n");
    for recipe in recipes {
        let _ = writeln!(out, "{}", recipe_line(recipe, favorites.contains(&recipe.id)));
    }
    out
}

pub fn render_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories available.\n".to_string();
    }
    let mut out = String::new();
    for category in categories {
        match category.count {
            Some(count) => {
                let _ = writeln!(out, "  {} ({})", category.name, count);
            }
            None => {
                let _ = writeln!(out, "  {}", category.name);
            }
        }
    }
    out
}

pub const HELP: &str = "\
Commands:
  list                    show the recipe feed
  search [text]           search recipes (no text clears the search)
  cuisine <name|all>      filter by cuisine
  diet <name|all>         filter by diet
  maxtime <minutes|all>   filter by maximum cook time
  reset                   clear all filters
  more                    load the next page
  fav <id>                toggle a favorite
  favorites               show favorite recipes
  show <id>               show a recipe
  featured                show featured recipes
  categories              list categories
  help                    show this help
  quit                    exit
";
