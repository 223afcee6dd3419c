//! Event manager: the domain CRUD surface over a repository

use crate::error::{EventError, Result};
use crate::models::{CreateEvent, Event, is_valid_id};
use crate::repository::EventRepository;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Coordinates event operations against one repository.
///
/// Every repository call holds one of `max_in_flight` permits and must
/// finish, permit wait included, within `call_timeout`.
pub struct EventManager<R: EventRepository> {
    repository: R,
    permits: Semaphore,
    max_in_flight: usize,
    call_timeout: Duration,
}

impl<R: EventRepository> EventManager<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            permits: Semaphore::new(DEFAULT_MAX_IN_FLIGHT),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Bound concurrent repository calls (at least one).
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        let max_in_flight = max_in_flight.max(1);
        self.permits = Semaphore::new(max_in_flight);
        self.max_in_flight = max_in_flight;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    async fn guarded<T, F>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let bounded = async {
            let _permit = self.permits.acquire().await.map_err(|_| {
                EventError::BackendUnavailable("event manager is closed".to_string())
            })?;
            call.await
        };

        match tokio::time::timeout(self.call_timeout, bounded).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout = ?self.call_timeout, "Backend call timed out");
                Err(EventError::Timeout(format!(
                    "{} exceeded {:?}",
                    operation, self.call_timeout
                )))
            }
        }
    }

    /// Get event by ID; absence is not an error
    #[instrument(skip(self))]
    pub async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        self.guarded("fetch_by_id", self.repository.fetch_by_id(id))
            .await
    }

    /// List every stored event
    #[instrument(skip(self))]
    pub async fn get_events(&self) -> Result<Vec<Event>> {
        self.guarded("fetch_all", self.repository.fetch_all()).await
    }

    /// Decode a raw JSON payload and store it
    #[instrument(skip(self, raw_payload), fields(payload_len = raw_payload.len()))]
    pub async fn create_event(&self, raw_payload: &str) -> Result<Event> {
        let create: CreateEvent = serde_json::from_str(raw_payload)
            .map_err(|e| EventError::MalformedPayload(e.to_string()))?;
        if let Some(id) = create.id.as_deref().filter(|id| !is_valid_id(id)) {
            return Err(EventError::MalformedPayload(format!("invalid id {:?}", id)));
        }

        let event = self.guarded("store", self.repository.store(create)).await?;
        info!(event_id = %event.id, "Event stored");
        Ok(event)
    }

    /// Delete event by ID; `false` when it did not exist
    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: &str) -> Result<bool> {
        let deleted = self
            .guarded("delete_by_id", self.repository.delete_by_id(id))
            .await?;
        if deleted {
            info!(event_id = %id, "Event deleted");
        }
        Ok(deleted)
    }

    /// Backend reachability, with the failure reason
    pub async fn ping(&self) -> Result<()> {
        self.guarded("ping", self.repository.ping()).await
    }

    /// Whether the backend is reachable
    pub async fn health(&self) -> bool {
        self.ping().await.is_ok()
    }
}
