//! OpenAPI documentation configuration

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Events API",
        description = "Create, fetch, list and delete events stored in a search backend"
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    )
)]
struct ServiceDoc;

/// Combined OpenAPI documentation: service info plus the events domain.
///
/// The events routes are mounted at the root, so the domain document is
/// merged rather than nested.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        ServiceDoc::openapi().merge_from(domain_events::ApiDoc::openapi())
    }
}
