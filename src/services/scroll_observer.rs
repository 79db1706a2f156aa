//! Proximity detection for the sentinel placed after the recipe list.
//!
//! The front end reports viewport geometry through [`ScrollObserver::observe`];
//! subscribers receive a [`LoadMoreSignal`] each time the sentinel comes
//! within the margin of the viewport bottom. Dropping a [`Subscription`]
//! unsubscribes it.

use crate::state::lock;
use async_std::channel::{self, Receiver, Sender, TryRecvError};
use log::debug;
use std::sync::{Arc, Mutex, Weak};

/// Request to load the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadMoreSignal;

/// Scroll geometry in pixels, measured from the top of the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub viewport_height: f64,
    /// Top edge of the sentinel element.
    pub sentinel_top: f64,
}

impl Viewport {
    /// Whether the sentinel lies within `margin` below the visible area.
    pub fn sentinel_near(&self, margin: f64) -> bool {
        self.sentinel_top <= self.scroll_top + self.viewport_height + margin
    }
}

#[derive(Default)]
struct ObserverInner {
    subscribers: Vec<(u64, Sender<LoadMoreSignal>)>,
    next_id: u64,
    near: bool,
}

impl ObserverInner {
    fn broadcast(&mut self) -> usize {
        // Only closed channels fail to accept; a full one already has a pending signal.
        self.subscribers
            .retain(|(_, tx)| !matches!(tx.try_send(LoadMoreSignal), Err(e) if e.is_closed()));
        self.subscribers.len()
    }
}

/// Emits load-more signals when the sentinel nears the viewport.
#[derive(Clone)]
pub struct ScrollObserver {
    inner: Arc<Mutex<ObserverInner>>,
    margin: f64,
}

impl ScrollObserver {
    pub fn new(margin: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ObserverInner::default())),
            margin,
        }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).subscribers.len()
    }

    /// Registers a new subscriber.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = channel::bounded(1);
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, tx));
        debug!("Scroll subscriber {} attached", id);
        Subscription {
            id,
            observer: Arc::downgrade(&self.inner),
            receiver: rx,
        }
    }

    /// Reports new geometry; returns `true` if a signal was sent.
    ///
    /// Fires only on the transition from far to near.
    pub fn observe(&self, viewport: Viewport) -> bool {
        let near = viewport.sentinel_near(self.margin);
        let mut inner = lock(&self.inner);
        let was_near = std::mem::replace(&mut inner.near, near);
        if near && !was_near {
            debug!("Sentinel entered proximity at scroll {}", viewport.scroll_top);
            inner.broadcast() > 0
        } else {
            false
        }
    }

    /// Forgets the last proximity state so a still-near sentinel fires again.
    pub fn rearm(&self) {
        lock(&self.inner).near = false;
    }

    /// Manual "load more": signals subscribers regardless of geometry.
    pub fn trigger(&self) -> bool {
        lock(&self.inner).broadcast() > 0
    }
}

impl Default for ScrollObserver {
    fn default() -> Self {
        Self::new(crate::config::SCROLL_PROXIMITY_MARGIN)
    }
}

/// Receiving end of a scroll subscription.
pub struct Subscription {
    id: u64,
    observer: Weak<Mutex<ObserverInner>>,
    receiver: Receiver<LoadMoreSignal>,
}

impl Subscription {
    /// Waits for the next signal; `None` once the observer is gone.
    pub async fn next(&self) -> Option<LoadMoreSignal> {
        self.receiver.recv().await.ok()
    }

    /// Discards signals that arrived while the subscriber was busy.
    pub fn drain(&self) -> usize {
        let mut dropped = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(_) => dropped += 1,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return dropped,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observer) = self.observer.upgrade() {
            lock(&observer).subscribers.retain(|(id, _)| *id != self.id);
            debug!("Scroll subscriber {} detached", self.id);
        }
    }
}
