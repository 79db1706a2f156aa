//! Recipe browser: paginated, filterable recipe feed with local favorites.

pub mod api;
pub mod config;
pub mod error;
pub mod filtering;
pub mod models;
pub mod recipe_cache;
pub mod samples;
pub mod services;
pub mod startup;
pub mod state;
pub mod storage;
pub mod ui;

pub use error::{AppError, Result};
pub use startup::Session;
