//! Response types shared by all handlers.
//!
//! # Responsibilities
//! - Define the `{message}` / `{error}` response envelope
//! - Map every error onto a consistent status + JSON `{error}` body
//! - Keep internal failure detail out of client responses
//!
//! # Design Decisions
//! - Every response carries exactly one of a success payload or `error`
//! - Internal detail is logged via tracing, never echoed to clients

use axum::{
    body::Body,
    extract::rejection::JsonRejection,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Success envelope for greeting responses.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Error envelope: the only error shape clients ever see.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors that can cross the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required request field is missing or empty.
    #[error("{0}")]
    Validation(String),

    /// The request body was not valid JSON.
    #[error("Malformed JSON body")]
    MalformedBody,

    /// The request body exceeded the configured size limit.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// No route matched the request.
    #[error("Endpoint not found")]
    NotFound,

    /// The client exceeded its rate limit.
    #[error("Too many requests")]
    RateLimited,

    /// Anything unexpected. The detail is logged, not returned.
    #[error("Internal Server Error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection, "Rejected request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::MalformedBody
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Middleware function wrapping layer-generated rejections in the error
/// envelope.
///
/// The timeout and body-limit layers reply with bare 408/413 responses;
/// every client-visible error must carry the `{error}` body, so those are
/// rewritten here. Responses that are already JSON pass through untouched.
pub async fn error_envelope_middleware(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;

    let already_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.as_bytes().starts_with(b"application/json"))
        .unwrap_or(false);

    if already_json {
        return response;
    }

    let error = match response.status() {
        StatusCode::REQUEST_TIMEOUT => "Request timeout",
        StatusCode::PAYLOAD_TOO_LARGE => "Request body too large",
        _ => return response,
    };

    (
        response.status(),
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
        .into_response()
}
