//! Event Bus implementation.
//!
//! The alignment engine publishes telemetry here. Synchronous handlers
//! run on the publishing thread; async consumers poll a broadcast
//! receiver. An optional bounded history keeps the most recent events
//! for reporting.

use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use tokio::sync::broadcast;

use super::events::{AppEvent, EventCategory};

/// Broadcast channel capacity for async receivers
pub const CHANNEL_CAPACITY: usize = 1024;

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Box<dyn Fn(AppEvent) + Send + Sync>;

/// Publish/subscribe hub for alignment telemetry
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
    handlers: RwLock<Vec<(EventFilter, EventHandler)>>,
    history: Mutex<VecDeque<AppEvent>>,
    history_limit: usize,
}

impl EventBus {
    /// Create a bus without history
    pub fn new() -> Self {
        Self::with_history(0)
    }

    /// Create a bus that keeps the last `limit` events
    pub fn with_history(limit: usize) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            handlers: RwLock::new(Vec::new()),
            history: Mutex::new(VecDeque::with_capacity(limit)),
            history_limit: limit,
        }
    }

    /// Publish an event
    ///
    /// Returns how many handlers and receivers saw it.
    pub fn publish(&self, event: AppEvent) -> usize {
        tracing::trace!("Publishing {}", event.description());

        if self.history_limit > 0 {
            let mut history = self.history.lock();
            if history.len() == self.history_limit {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        let mut delivered = 0;
        for (filter, handler) in self.handlers.read().iter() {
            if filter.matches(&event) {
                handler(event.clone());
                delivered += 1;
            }
        }

        // No receivers is not an error: telemetry is fire-and-forget
        delivered + self.sender.send(event).unwrap_or(0)
    }

    /// Publish a batch of events in order
    pub fn publish_all(&self, events: impl IntoIterator<Item = AppEvent>) {
        for event in events {
            self.publish(event);
        }
    }

    /// Subscribe with a synchronous handler
    ///
    /// The handler runs on the publishing thread, so it should
    /// return quickly and must not publish.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F)
    where
        F: Fn(AppEvent) + Send + Sync + 'static,
    {
        self.handlers.write().push((filter, Box::new(handler)));
        tracing::debug!("Event handler added");
    }

    /// Receiver for async polling; sees events published after this call
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Retained events, oldest first
    pub fn history(&self) -> Vec<AppEvent> {
        self.history.lock().iter().cloned().collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.read().len())
            .field("history_limit", &self.history_limit)
            .finish()
    }
}
