//! HTTP implementation of [`RecipeApi`].
//!
//! reqwest needs a tokio reactor; every request is wrapped in
//! `async_compat::Compat` so it can be awaited from the async-std executor.

use super::normalize::{normalize_categories, normalize_recipe_page};
use super::{RecipeApi, RecipeQuery};
use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::models::{Category, Recipe, RecipePage};
use async_compat::Compat;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Response, Url};
use serde_json::Value;

/// Client for the recipe backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        let base_url = config.absolute_base();
        info!("Recipe API base: {}", base_url);
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{path}`, whether or not `path` starts with `/`.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `{base}/recipes/{id}` with `id` escaped as one path segment.
    fn recipe_url(&self, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint("/recipes"))
            .map_err(|e| AppError::Config(format!("Invalid API base {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Config(format!("API base {} cannot hold a path", self.base_url))
            })?
            .push(id);
        Ok(url)
    }

    async fn get_json(&self, url: Url, query: &[(&'static str, String)]) -> Result<Value> {
        debug!("GET {} {:?}", url, query);
        Compat::new(async {
            let response = self.http.get(url).query(query).send().await?;
            let response = ensure_success(response)?;
            Ok::<Value, AppError>(response.json::<Value>().await?)
        })
        .await
    }

    fn parse_url(&self, path: &str) -> Result<Url> {
        let raw = self.endpoint(path);
        Url::parse(&raw).map_err(|e| AppError::Config(format!("Invalid API URL {}: {}", raw, e)))
    }
}

/// Turns a non-success status into [`AppError::Request`].
fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppError::Request {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }
}

#[async_trait]
impl RecipeApi for ApiClient {
    async fn fetch_recipes(&self, query: &RecipeQuery) -> Result<RecipePage> {
        let url = self.parse_url("/recipes")?;
        let payload = self.get_json(url, &query.to_query_pairs()).await?;
        let page = normalize_recipe_page(payload, query.page);
        info!(
            "Fetched page {} with {} recipe(s), has more: {}",
            page.page,
            page.recipes.len(),
            page.has_more
        );
        Ok(page)
    }

    async fn fetch_recipe(&self, id: &str) -> Result<Recipe> {
        let url = self.recipe_url(id)?;
        let payload = self.get_json(url, &[]).await?;
        Ok(serde_json::from_value(payload)?)
    }

    async fn fetch_featured(&self) -> Result<Vec<Recipe>> {
        let url = self.parse_url("/recipes/featured")?;
        let payload = self.get_json(url, &[]).await?;
        Ok(normalize_recipe_page(payload, 1).recipes)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        let url = self.parse_url("/categories")?;
        let payload = self.get_json(url, &[]).await?;
        Ok(normalize_categories(payload))
    }

    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value> {
        let url = self.parse_url(endpoint)?;
        debug!("POST {}", url);
        Compat::new(async {
            let response = self.http.post(url).json(body).send().await?;
            let response = ensure_success(response)?;
            Ok::<Value, AppError>(response.json::<Value>().await?)
        })
        .await
    }
}
