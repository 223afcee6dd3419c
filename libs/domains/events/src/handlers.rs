//! HTTP handlers for the `/events` resource

use crate::error::EventError;
use crate::models::{CreateEvent, Event, is_valid_id};
use crate::repository::EventRepository;
use crate::response::Response;
use crate::service::EventManager;
use crate::utils::{body_to_string, query_to_map};
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tracing::instrument;

pub const EVENTS_PATH: &str = "/events";

pub const CREATED_MESSAGE: &str = "Created event successfully";
pub const DELETED_MESSAGE: &str = "Deleted event";
pub const NOT_DELETED_MESSAGE: &str = "Event did not exist";

/// Events router state
pub type EventsState<R> = Arc<EventManager<R>>;

/// Create the events router.
///
/// GET, POST and DELETE are served at `/events`; any other method there is
/// answered with 405.
pub fn events_router<R: EventRepository + 'static>(manager: EventsState<R>) -> Router {
    Router::new()
        .route(
            EVENTS_PATH,
            get(get_events::<R>)
                .post(create_event::<R>)
                .delete(delete_event::<R>)
                .fallback(unsupported_method),
        )
        .with_state(manager)
}

async fn unsupported_method() -> EventError {
    EventError::UnsupportedMethod
}

/// The `id` query parameter: absent is `None`, present but not a valid id is malformed.
fn id_param(query: Option<&str>) -> Result<Option<String>, EventError> {
    match query_to_map(query).remove("id") {
        Some(id) if !is_valid_id(&id) => Err(EventError::MalformedRequest),
        other => Ok(other),
    }
}

/// Get one event by id, or list all events without an id
#[utoipa::path(
    get,
    path = "/events",
    params(
        ("id" = Option<String>, Query, description = "Event ID; omit to list all events")
    ),
    responses(
        (status = 200, description = "The event, or every event when no id is given", body = Event),
        (status = 400, description = "Empty id parameter"),
        (status = 404, description = "Event not found"),
        (status = 502, description = "Backend error"),
        (status = 503, description = "Backend unavailable"),
        (status = 504, description = "Backend timed out")
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn get_events<R: EventRepository>(
    State(state): State<EventsState<R>>,
    RawQuery(query): RawQuery,
) -> Result<Response, EventError> {
    match id_param(query.as_deref())? {
        Some(id) => match state.get_event(&id).await? {
            Some(event) => Response::json(StatusCode::OK, &event),
            None => Err(EventError::NotFound { id }),
        },
        None => {
            let events = state.get_events().await?;
            Response::json(StatusCode::OK, &events)
        }
    }
}

/// Create an event from a JSON object body
#[utoipa::path(
    post,
    path = "/events",
    request_body = CreateEvent,
    responses(
        (status = 200, description = "Event created; Location points at it", body = String,
            headers(("location" = String, description = "/events?id=<id>"))),
        (status = 400, description = "Malformed event payload"),
        (status = 502, description = "Backend error"),
        (status = 503, description = "Backend unavailable"),
        (status = 504, description = "Backend timed out")
    ),
    tag = "events"
)]
#[instrument(skip(state, headers, body), fields(body_len = body.len()))]
pub async fn create_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, EventError> {
    let payload = body_to_string(&headers, &body)?;
    let event = state.create_event(&payload).await?;

    Ok(Response::text(StatusCode::OK, CREATED_MESSAGE).with_location(format!(
        "{}?id={}",
        EVENTS_PATH,
        urlencoding::encode(&event.id)
    )))
}

/// Delete an event by id
#[utoipa::path(
    delete,
    path = "/events",
    params(
        ("id" = String, Query, description = "Event ID")
    ),
    responses(
        (status = 200, description = "\"Deleted event\" or \"Event did not exist\"", body = String),
        (status = 400, description = "Missing or empty id parameter"),
        (status = 502, description = "Backend error"),
        (status = 503, description = "Backend unavailable"),
        (status = 504, description = "Backend timed out")
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn delete_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    RawQuery(query): RawQuery,
) -> Result<Response, EventError> {
    let id = id_param(query.as_deref())?.ok_or(EventError::MalformedRequest)?;

    let message = if state.delete_event(&id).await? {
        DELETED_MESSAGE
    } else {
        NOT_DELETED_MESSAGE
    };
    Ok(Response::text(StatusCode::OK, message))
}
