//! Application configuration constants and environment resolution.

use crate::error::{AppError, Result};
use crate::services::browse_service::RecoveryPolicy;
use std::path::PathBuf;

/// Storage key holding the JSON-encoded favorites list.
pub const FAVORITES_STORAGE_KEY: &str = "recipe_favorites";

/// Base path used when no API URL is configured.
pub const DEFAULT_API_BASE: &str = "/api";

/// Origin a relative API base is resolved against.
pub const DEFAULT_APP_ORIGIN: &str = "http://localhost:3000";

/// Recipes requested per page on the home feed.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Page size of the single bulk fetch made by the favorites view.
pub const FAVORITES_BULK_PAGE_SIZE: u32 = 100;

/// Distance in pixels below the viewport at which the sentinel counts as visible.
pub const SCROLL_PROXIMITY_MARGIN: f64 = 200.0;

pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Number of recipe details kept in the detail cache.
pub const DETAIL_CACHE_CAPACITY: usize = 32;

pub const ENV_API_URL: &str = "RECIPES_API_URL";
pub const ENV_API_URL_FALLBACK: &str = "API_BASE_URL";
pub const ENV_APP_ORIGIN: &str = "RECIPES_APP_ORIGIN";
pub const ENV_DATA_DIR: &str = "RECIPES_DATA_DIR";
pub const ENV_PAGE_SIZE: &str = "RECIPES_PAGE_SIZE";
pub const ENV_ON_FIRST_PAGE_ERROR: &str = "RECIPES_ON_FIRST_PAGE_ERROR";

/// Settings for reaching the recipe API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Configured base, possibly relative (`/api`).
    pub base_url: String,
    /// Origin used to absolutize a relative base.
    pub origin: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            origin: DEFAULT_APP_ORIGIN.to_string(),
        }
    }

    /// Absolute base URL without a trailing slash.
    pub fn absolute_base(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.starts_with("http://") || base.starts_with("https://") {
            base.to_string()
        } else {
            let origin = self.origin.trim_end_matches('/');
            let path = base.trim_start_matches('/');
            if path.is_empty() {
                origin.to_string()
            } else {
                format!("{}/{}", origin, path)
            }
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

/// Picks the API base: first non-empty of primary, secondary, else `/api`.
pub fn resolve_api_base(primary: Option<String>, secondary: Option<String>) -> String {
    [primary, secondary]
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

/// Complete runtime configuration of a browsing session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    /// Directory for durable storage; `None` selects the platform data dir.
    pub data_dir: Option<PathBuf>,
    pub page_size: u32,
    pub recovery: RecoveryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            data_dir: None,
            page_size: DEFAULT_PAGE_SIZE,
            recovery: RecoveryPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut api = ApiConfig::new(resolve_api_base(
            lookup(ENV_API_URL),
            lookup(ENV_API_URL_FALLBACK),
        ));
        if let Some(origin) = non_empty(ENV_APP_ORIGIN) {
            api.origin = origin.trim().to_string();
        }

        let page_size = match non_empty(ENV_PAGE_SIZE) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(AppError::Config(format!(
                        "{} must be a positive integer, got {:?}",
                        ENV_PAGE_SIZE, raw
                    )));
                }
            },
            None => DEFAULT_PAGE_SIZE,
        };

        let recovery = match non_empty(ENV_ON_FIRST_PAGE_ERROR) {
            Some(raw) => raw.parse::<RecoveryPolicy>()?,
            None => RecoveryPolicy::default(),
        };

        Ok(Self {
            api,
            data_dir: non_empty(ENV_DATA_DIR).map(PathBuf::from),
            page_size,
            recovery,
        })
    }

    /// Directory holding durable storage files.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let dirs = directories::ProjectDirs::from("com", "recipes", "recipe-browser")
            .ok_or_else(|| AppError::Storage("unable to get project dirs".to_string()))?;
        Ok(dirs.data_dir().to_path_buf())
    }
}
