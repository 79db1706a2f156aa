//! Service layer for business logic.
//!
//! Separates the browsing logic from the terminal front end so it can be
//! driven and tested without any UI.

pub mod browse_service;
pub mod detail_service;
pub mod favorites_service;
pub mod scroll_observer;
pub mod search_debouncer;

pub use browse_service::{BrowseService, FeedPhase, FeedSnapshot, LoadOutcome, RecoveryPolicy};
pub use detail_service::{DetailView, RecipeDetailService};
pub use favorites_service::{CatalogSource, FavoritesView, filter_favorites};
pub use scroll_observer::{LoadMoreSignal, ScrollObserver, Subscription, Viewport};
pub use search_debouncer::SearchDebouncer;
