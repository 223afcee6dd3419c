//! Immutable HTTP response value written once per request

use crate::error::Result;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use serde::Serialize;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json; charset=utf-8";

/// Body format of a [`Response`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Json,
}

impl ContentType {
    fn header_value(self) -> HeaderValue {
        match self {
            ContentType::Text => HeaderValue::from_static(TEXT_PLAIN),
            ContentType::Json => HeaderValue::from_static(APPLICATION_JSON),
        }
    }
}

/// Status plus message, fixed at construction.
///
/// Converting it with [`IntoResponse`] consumes it, so a handler can only
/// ever write one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    body: String,
    content_type: ContentType,
    location: Option<String>,
}

impl Response {
    pub fn text(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: message.into(),
            content_type: ContentType::Text,
            location: None,
        }
    }

    /// Serialize `value` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Self> {
        Ok(Self {
            status,
            body: serde_json::to_string(value)?,
            content_type: ContentType::Json,
            location: None,
        })
    }

    /// Attach a `Location` header pointing at a created resource.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let mut response = (self.status, self.body).into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, self.content_type.header_value());

        if let Some(location) = self.location {
            match HeaderValue::try_from(location) {
                Ok(value) => {
                    headers.insert(header::LOCATION, value);
                }
                Err(e) => tracing::warn!(error = %e, "Dropping unrepresentable Location header"),
            }
        }

        response
    }
}
