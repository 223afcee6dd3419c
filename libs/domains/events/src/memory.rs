//! In-memory implementation of EventRepository

use crate::error::Result;
use crate::models::{CreateEvent, Event};
use crate::repository::EventRepository;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

/// Process-local event store for tests and local development.
///
/// Generated ids are UUIDv7, so listing in id order is also creation order
/// for events without a client-chosen id.
#[derive(Debug, Default)]
pub struct MemoryEventRepository {
    events: RwLock<HashMap<String, Event>>,
}

impl MemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    #[instrument(skip(self))]
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.events.read().await.get(id).cloned())
    }

    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self.events.read().await.values().cloned().collect();
        events.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(events)
    }

    #[instrument(skip(self, event))]
    async fn store(&self, event: CreateEvent) -> Result<Event> {
        let id = event
            .id
            .clone()
            .unwrap_or_else(|| Uuid::now_v7().to_string());
        let event = event.into_event(id);

        self.events
            .write()
            .await
            .insert(event.id.clone(), event.clone());
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        Ok(self.events.write().await.remove(id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
