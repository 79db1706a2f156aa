//! Debouncing for search input.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Collapses bursts of search input into the last value typed.
#[derive(Clone)]
pub struct SearchDebouncer {
    latest: Arc<AtomicU64>,
    delay: Duration,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            delay,
        }
    }

    /// Waits out the delay and returns `text` only if nothing newer arrived.
    pub async fn settle(&self, text: String) -> Option<String> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        async_std::task::sleep(self.delay).await;
        (self.latest.load(Ordering::SeqCst) == ticket).then_some(text)
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::SEARCH_DEBOUNCE_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join;

    #[async_std::test]
    async fn only_the_last_input_settles() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(30));
        let early = debouncer.settle("cur".to_string());
        let late = async {
            async_std::task::sleep(Duration::from_millis(5)).await;
            debouncer.settle("curry".to_string()).await
        };

        let (early, late) = join(early, late).await;
        assert_eq!(early, None);
        assert_eq!(late.as_deref(), Some("curry"));
    }

    #[async_std::test]
    async fn lone_input_settles() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(1));
        assert_eq!(debouncer.settle("soup".to_string()).await.as_deref(), Some("soup"));
    }
}
