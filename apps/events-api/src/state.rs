//! Application state management.
//!
//! One [`EventManager`] is built per process in `main` and shared by
//! reference counting; nothing here is global.

use domain_events::{EventManager, EventRepository};
use std::sync::Arc;

/// Shared application state, generic over the event backend.
pub struct AppState<R: EventRepository> {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// The process-wide event manager
    pub events: Arc<EventManager<R>>,
}

impl<R: EventRepository> AppState<R> {
    pub fn new(config: crate::config::Config, repository: R) -> Self {
        let manager = EventManager::new(repository)
            .with_max_in_flight(config.events.max_in_flight)
            .with_call_timeout(config.events.call_timeout);

        Self {
            config,
            events: Arc::new(manager),
        }
    }
}

// Manual impl: cloning only bumps the Arc, so `R` itself need not be Clone.
impl<R: EventRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            events: Arc::clone(&self.events),
        }
    }
}
