//! HTTP route handlers

pub mod alerts;
pub mod lifecycle;
pub mod reports;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::ApiError;

/// Standard response wrapper
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl Envelope<()> {
    /// Message-only response
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            data: None,
        }
    }
}

/// Default actor recorded when a request names none
pub(crate) fn actor_or_system(actor: Option<String>) -> String {
    actor
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| "System".to_string())
}

/// Request carried no JSON at all (no body, no JSON content type)
fn body_absent(rejection: &JsonRejection) -> bool {
    matches!(rejection, JsonRejection::MissingJsonContentType(_))
}

fn malformed(rejection: JsonRejection) -> ApiError {
    debug!("Rejected request body: {}", rejection.body_text());
    let message = match rejection {
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
        JsonRejection::JsonDataError(_) => "Request body has missing or mistyped fields",
        _ => "Invalid request body",
    };
    ApiError::bad_request(message)
}

/// Body the handler cannot do without; absent bodies get `missing` as the 400 message
pub(crate) fn required_body<T>(
    body: Result<Json<T>, JsonRejection>,
    missing: &str,
) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if body_absent(&rejection) => Err(ApiError::bad_request(missing)),
        Err(rejection) => Err(malformed(rejection)),
    }
}

/// Body whose fields all have defaults; absent means defaults, malformed is a 400
pub(crate) fn optional_body<T: Default>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if body_absent(&rejection) => Ok(T::default()),
        Err(rejection) => Err(malformed(rejection)),
    }
}
