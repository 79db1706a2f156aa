//! Converts the two list response shapes into a [`RecipePage`].
//!
//! The list endpoint answers either with a bare JSON array of recipes or with
//! a paginated envelope `{recipes, total, hasMore, page}`. Missing or odd
//! fields are defaulted rather than treated as errors.

use crate::models::{Category, Recipe, RecipePage};
use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Field names tried, in order, for the recipe list inside an envelope.
const RECIPE_LIST_FIELDS: [&str; 3] = ["recipes", "data", "items"];

/// Normalizes a list response for a request of `requested_page`.
pub fn normalize_recipe_page(payload: Value, requested_page: u32) -> RecipePage {
    match payload {
        Value::Array(items) => {
            let recipes = decode_items::<Recipe>(items);
            RecipePage {
                total: recipes.len() as u64,
                recipes,
                has_more: false,
                page: 1,
            }
        }
        Value::Object(mut envelope) => {
            let recipes = RECIPE_LIST_FIELDS
                .iter()
                .find_map(|field| match envelope.remove(*field) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                })
                .map(decode_items::<Recipe>)
                .unwrap_or_default();

            let total = envelope
                .get("total")
                .and_then(Value::as_u64)
                .unwrap_or(recipes.len() as u64);
            let has_more = envelope
                .get("hasMore")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let page = envelope
                .get("page")
                .and_then(Value::as_u64)
                .and_then(|p| u32::try_from(p).ok())
                .unwrap_or(requested_page);

            RecipePage {
                recipes,
                total,
                has_more,
                page,
            }
        }
        other => {
            warn!("Unexpected recipe list payload: {}", type_name(&other));
            RecipePage {
                page: requested_page,
                ..RecipePage::default()
            }
        }
    }
}

/// Categories arrive as a bare array or as `{categories: [...]}`.
pub fn normalize_categories(payload: Value) -> Vec<Category> {
    match payload {
        Value::Array(items) => decode_items(items),
        Value::Object(mut envelope) => match envelope.remove("categories") {
            Some(Value::Array(items)) => decode_items(items),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Decodes each element, skipping the ones that do not fit.
fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Skipping malformed list entry: {}", e);
                None
            }
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(page: &RecipePage) -> Vec<&str> {
        page.recipes.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn bare_array_is_wrapped_as_single_final_page() {
        let page = normalize_recipe_page(
            json!([{ "id": "a" }, { "id": "b" }, { "id": "c" }]),
            4,
        );
        assert_eq!(ids(&page), ["a", "b", "c"]);
        assert_eq!(page.total, 3);
        assert!(!page.has_more);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn envelope_fields_pass_through() {
        let page = normalize_recipe_page(
            json!({
                "recipes": [{ "id": "1" }, { "id": "2" }],
                "total": 5,
                "hasMore": true,
                "page": 2
            }),
            2,
        );
        assert_eq!(ids(&page), ["1", "2"]);
        assert_eq!(page.total, 5);
        assert!(page.has_more);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn envelope_defaults_fill_missing_fields() {
        let page = normalize_recipe_page(json!({ "data": [{ "id": "9" }] }), 3);
        assert_eq!(ids(&page), ["9"]);
        assert_eq!(page.total, 1);
        assert!(!page.has_more);
        assert_eq!(page.page, 3);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let page = normalize_recipe_page(json!([{ "id": "1" }, { "name": "no id" }, 42]), 1);
        assert_eq!(ids(&page), ["1"]);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn unexpected_payload_yields_empty_page() {
        let page = normalize_recipe_page(json!("oops"), 2);
        assert!(page.recipes.is_empty());
        assert_eq!(page.page, 2);
        assert!(!page.has_more);
    }

    #[test]
    fn categories_accept_both_shapes() {
        let bare = normalize_categories(json!([{ "name": "Desserts" }]));
        let wrapped = normalize_categories(json!({ "categories": [{ "id": 1, "name": "Soups" }] }));
        assert_eq!(bare[0].name, "Desserts");
        assert_eq!(wrapped[0].id.as_deref(), Some("1"));
    }
}
