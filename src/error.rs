// src/error.rs
// =============================================================================
// Every way a request can fail, and the HTTP answer each one turns into.
//
// Failures never travel past the HTTP boundary: the handler converts the
// error into a status code and a short plain-text body, and a single log line
// records the detailed cause. Callers only ever see the short message.
// =============================================================================

use std::time::Duration;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Seconds a rejected caller is told to wait before trying again.
pub const RETRY_AFTER_SECS: u64 = 5;

#[derive(Error, Debug)]
pub enum GateError {
    /// Request body is not the expected JSON object
    #[error("JSON body is malformed: {0}")]
    MalformedRequestBody(#[from] serde_json::Error),

    /// URL failed to parse, or uses a scheme other than http/https
    #[error("invalid URL {raw:?}: {reason}")]
    InvalidUrl { raw: String, reason: String },

    /// Admission queue is at capacity
    #[error("admission queue is full")]
    QueueSaturated,

    /// The crawl executable could not be started
    #[error("failed to start crawl command: {0}")]
    ProcessStartFailed(String),

    /// No launch outcome arrived before the deadline
    #[error("no launch outcome within {0:?}")]
    LaunchTimedOut(Duration),

    /// The job was dropped without an outcome (dispatcher shutting down)
    #[error("dispatcher dropped the job without an outcome")]
    DispatcherUnavailable,

    /// Result document is missing or unreadable
    #[error("failed to read domain document {name:?}: {source}")]
    DomainDocumentUnavailable {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, GateError>;

impl GateError {
    pub fn invalid_url(raw: &str, reason: impl Into<String>) -> Self {
        GateError::InvalidUrl {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::MalformedRequestBody(_) | GateError::InvalidUrl { .. } => {
                StatusCode::BAD_REQUEST
            }
            GateError::QueueSaturated => StatusCode::SERVICE_UNAVAILABLE,
            GateError::LaunchTimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
            GateError::ProcessStartFailed(_)
            | GateError::DispatcherUnavailable
            | GateError::DomainDocumentUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // The short text the caller sees. Details stay in the log.
    fn public_message(&self) -> &'static str {
        match self {
            GateError::MalformedRequestBody(_) => "JSON body is malformed",
            GateError::InvalidUrl { .. } => "Invalid URL",
            GateError::QueueSaturated => {
                "Your crawl cannot be processed at this time. Please try again later."
            }
            GateError::ProcessStartFailed(_) => "failed to start crawl command",
            GateError::LaunchTimedOut(_) => "timed out waiting for the crawl to start",
            GateError::DispatcherUnavailable => "crawl dispatcher is unavailable",
            GateError::DomainDocumentUnavailable { .. } => "failed to read domain file",
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = self.public_message();
        match self {
            GateError::QueueSaturated => (
                status,
                [(header::RETRY_AFTER, RETRY_AFTER_SECS.to_string())],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}
