//! Event repository trait

use crate::error::Result;
use crate::models::{CreateEvent, Event};
use async_trait::async_trait;

/// Storage backend for events.
///
/// Implementations must be usable from many requests at once; the
/// [`EventManager`](crate::EventManager) is their only caller.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Get event by ID; `None` when no such event exists
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Event>>;

    /// All stored events, in backend-defined order
    async fn fetch_all(&self) -> Result<Vec<Event>>;

    /// Store an event, assigning an id when the payload has none
    async fn store(&self, event: CreateEvent) -> Result<Event>;

    /// Delete event by ID; `false` when there was nothing to delete
    async fn delete_by_id(&self, id: &str) -> Result<bool>;

    /// Verify the backend is reachable and serving
    async fn ping(&self) -> Result<()>;
}
