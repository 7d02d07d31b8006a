//! Route handlers for the greeting service.
//!
//! Every handler returns either a success envelope or an [`ApiError`];
//! nothing else ever reaches the client.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::http::response::{ApiError, MessageBody};

/// Request body for `POST /welcome`.
///
/// `name` is optional at the serde level so a missing field surfaces as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct WelcomeRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}

/// Response body for `POST /api/test`.
#[derive(Debug, Serialize)]
pub struct EchoBody {
    pub message: String,
    #[serde(rename = "receivedData")]
    pub received_data: Value,
    pub processed: bool,
}

/// Returns a greeting based on someone's name.
pub fn greet(name: &str) -> String {
    format!("Welcome {}", name)
}

/// `POST /welcome`: validate the `name` field and return a greeting.
pub async fn welcome(
    payload: Result<Json<WelcomeRequest>, JsonRejection>,
) -> Result<Json<MessageBody>, ApiError> {
    let Json(request) = payload?;

    match request.name.as_deref() {
        Some(name) if !name.is_empty() => Ok(Json(MessageBody {
            message: greet(name),
        })),
        _ => Err(ApiError::Validation("Name field is required".to_string())),
    }
}

/// `GET /health`: liveness probe, unconditionally healthy.
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "healthy" })
}

/// `GET /api/test`: fixed sample payload.
pub async fn echo_get() -> Json<Value> {
    Json(json!({
        "message": "GET request successful",
        "data": { "id": 1, "name": "Sample Data" },
    }))
}

/// `POST /api/test`: echo the payload back with a greeting.
pub async fn echo_post(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EchoBody>, ApiError> {
    let Json(body) = payload?;

    let message = body
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(|name| format!("Hello, {}!", name))
        .ok_or_else(|| ApiError::Validation("Name parameter is required".to_string()))?;

    Ok(Json(EchoBody {
        message,
        received_data: body,
        processed: true,
    }))
}

/// Fallback for any unmatched route.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
