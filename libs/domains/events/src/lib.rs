//! Events Domain
//!
//! CRUD access to free-form event records over a pluggable backend:
//! - [`ElasticEventRepository`] for Elasticsearch
//! - [`MemoryEventRepository`] for tests and local development
//!
//! ```text
//! HTTP /events ─► handlers ─► EventManager ─► EventRepository ─► backend
//!                                (permits + deadline)
//! ```

use utoipa::OpenApi;

mod elasticsearch;
mod error;
pub mod handlers;
mod memory;
mod models;
mod repository;
mod response;
mod service;
pub mod utils;

pub use elasticsearch::ElasticEventRepository;
pub use error::{EventError, Result};
pub use handlers::{EventsState, events_router};
pub use memory::MemoryEventRepository;
pub use models::{Attributes, CreateEvent, Event, is_valid_id};
pub use repository::EventRepository;
pub use response::{ContentType, Response};
pub use service::{DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_IN_FLIGHT, EventManager};

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_events,
        handlers::create_event,
        handlers::delete_event,
    ),
    components(schemas(Event, CreateEvent)),
    tags(
        (name = "events", description = "Event storage and retrieval")
    )
)]
pub struct ApiDoc;
