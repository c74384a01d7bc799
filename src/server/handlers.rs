//! HTTP request handlers for the QR generation API.
//!
//! # Endpoints
//!
//! - `POST /qr/generate` - Render a QR code as PNG
//! - `GET /stats/` - All-time generation count
//! - `GET /health` - Health check endpoint
//! - `GET /` - Landing page

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{EncodingError, FieldViolation, ValidationError};
use crate::qr::{QrEncoder, RawGenerationRequest, PNG_CONTENT_TYPE};
use crate::stats::{CounterStore, UsageCounter};

/// Message returned to clients for every encoding failure.
pub const GENERATION_FAILED_MESSAGE: &str = "Could not generate QR code";

/// Message returned by `/` when no landing page is installed.
pub const FRONTEND_NOT_FOUND_MESSAGE: &str = "Frontend not found";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// This is passed to all handlers via Axum's State extractor. The counter
/// store is injected here rather than reached through a global.
pub struct AppState<C: CounterStore> {
    /// Renders validated requests to PNG
    pub encoder: QrEncoder,

    /// Generation counter (absorbs store failures)
    pub counter: Arc<UsageCounter<C>>,

    /// Directory holding `index.html` and other static assets
    pub static_dir: Option<PathBuf>,
}

impl<C: CounterStore> AppState<C> {
    /// Create a new application state around the given counter.
    pub fn new(counter: UsageCounter<C>) -> Self {
        Self {
            encoder: QrEncoder::new(),
            counter: Arc::new(counter),
            static_dir: None,
        }
    }

    /// Serve the landing page and assets from `dir`.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}

impl<C: CounterStore> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            encoder: self.encoder.clone(),
            counter: Arc::clone(&self.counter),
            static_dir: self.static_dir.clone(),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "validation_error", "encoding_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Field-level violations for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
            details: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            status: Some(status.as_u16()),
            ..Self::new(error, message)
        }
    }

    /// Attach field-level violations.
    pub fn with_details(mut self, details: Vec<FieldViolation>) -> Self {
        self.details = Some(details);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
}

/// Response from the stats endpoint.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Number of QR codes generated since the store was created
    pub total_qr_generated: u64,
}

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Errors that cross the HTTP boundary.
///
/// Store errors never appear here: the usage counter absorbs them.
#[derive(Debug)]
pub enum ApiError {
    /// 422 Unprocessable Entity, with field details
    Validation(ValidationError),

    /// 500 Internal Server Error, with a generic message
    Encoding(EncodingError),

    /// Body could not be read at all (e.g. 413 over the size limit)
    Rejected(JsonRejection),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<EncodingError> for ApiError {
    fn from(err: EncodingError) -> Self {
        ApiError::Encoding(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_) => {
                ApiError::Validation(ValidationError::malformed_body(rejection.body_text()))
            }
            other => ApiError::Rejected(other),
        }
    }
}

/// Convert ApiError to HTTP response.
///
/// - 4xx errors are logged at WARN level with the violations
/// - 5xx errors are logged at ERROR level with the underlying cause, which
///   is not sent to the client
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(err) => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                warn!(
                    error_type = "validation_error",
                    status = status.as_u16(),
                    "Client error: {}",
                    err
                );

                let body = ErrorResponse::with_status("validation_error", err.to_string(), status)
                    .with_details(err.violations);
                (status, Json(body)).into_response()
            }
            ApiError::Encoding(err) => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                error!(
                    error_type = "encoding_error",
                    status = status.as_u16(),
                    "Error generating QR code: {}",
                    err
                );

                let body =
                    ErrorResponse::with_status("encoding_error", GENERATION_FAILED_MESSAGE, status);
                (status, Json(body)).into_response()
            }
            ApiError::Rejected(rejection) => {
                let status = rejection.status();
                warn!(
                    error_type = "request_error",
                    status = status.as_u16(),
                    "Request body rejected: {}",
                    rejection.body_text()
                );

                let body =
                    ErrorResponse::with_status("request_error", rejection.body_text(), status);
                (status, Json(body)).into_response()
            }
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle QR generation requests.
///
/// # Endpoint
///
/// `POST /qr/generate`
///
/// # Request Body
///
/// ```json
/// {
///   "content": "https://example.com",
///   "moduleSize": 10,
///   "borderWidth": 4,
///   "foregroundColor": "black",
///   "backgroundColor": "white"
/// }
/// ```
///
/// Only `content` is required.
///
/// # Response
///
/// - `200 OK`: PNG image with `Content-Type: image/png`
/// - `422 Unprocessable Entity`: Malformed body or out-of-range fields
/// - `500 Internal Server Error`: Content or colors could not be encoded
///
/// The usage counter is incremented only after a successful encode. The
/// increment is awaited so a following stats read observes it, but its
/// outcome never changes the response.
pub async fn generate_handler<C: CounterStore>(
    State(state): State<AppState<C>>,
    payload: Result<Json<RawGenerationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(raw) = payload?;
    let request = raw.validate()?;

    info!(
        "Generating QR code for content: {}",
        request.redacted_content()
    );

    let encoder = state.encoder.clone();
    let png = tokio::task::spawn_blocking(move || encoder.encode(&request))
        .await
        .map_err(|e| EncodingError::Task(e.to_string()))??;

    info!(bytes = png.len(), "QR code generated successfully");

    // Best-effort side effect
    state.counter.record_generation().await;

    Ok(([(header::CONTENT_TYPE, PNG_CONTENT_TYPE)], png).into_response())
}

/// Handle stats requests.
///
/// # Endpoint
///
/// `GET /stats/`
///
/// # Response
///
/// Always `200 OK`:
/// ```json
/// { "total_qr_generated": 42 }
/// ```
///
/// Store failures are reported as a count of 0.
pub async fn stats_handler<C: CounterStore>(
    State(state): State<AppState<C>>,
) -> Json<StatsResponse> {
    Json(StatsResponse {
        total_qr_generated: state.counter.total().await,
    })
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// { "status": "ok" }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Handle landing page requests.
///
/// # Endpoint
///
/// `GET /`
///
/// Serves `index.html` from the static directory. When the file is missing,
/// responds `200 OK` with `{"message": "Frontend not found"}`.
pub async fn index_handler<C: CounterStore>(State(state): State<AppState<C>>) -> Response {
    if let Some(ref dir) = state.static_dir {
        let index = dir.join("index.html");
        match tokio::fs::read_to_string(&index).await {
            Ok(html) => return Html(html).into_response(),
            Err(e) => debug!(path = %index.display(), error = %e, "Landing page unavailable"),
        }
    }

    Json(MessageResponse {
        message: FRONTEND_NOT_FOUND_MESSAGE.to_string(),
    })
    .into_response()
}

// =============================================================================
// Tests
// =============================================================================
