use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Failures raised by the relay itself
///
/// Upstream non-2xx responses are not errors: they are relayed verbatim.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Upstream URL or credential missing when a request arrived
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network failure sending to or reading from the upstream
    #[error("Connection error: {0}")]
    Connection(String),

    /// The configured upstream timeout elapsed
    #[error("Upstream timeout: {0}")]
    Timeout(String),

    /// The request body could not be decoded
    #[error("Invalid request: {message}")]
    InvalidRequest { status: StatusCode, message: String },

    /// The request content type is not JSON, urlencoded, or multipart
    #[error("Unsupported content type: {0}")]
    UnsupportedMediaType(String),

    /// Any other local fault
    #[error("Internal error: {0}")]
    Internal(String),
}

/// How local faults are reported to callers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Upstream connection failures become 502, timeouts 504
    Distinguish,
    /// Every local fault becomes a flat 500
    #[default]
    Collapse,
}

impl ErrorPolicy {
    pub const fn from_collapse_flag(collapse: bool) -> Self {
        if collapse { Self::Collapse } else { Self::Distinguish }
    }
}

impl RelayError {
    /// HTTP status code for this error under the given policy
    pub fn status_code(&self, policy: ErrorPolicy) -> StatusCode {
        match (self, policy) {
            (Self::InvalidRequest { status, .. }, _) => *status,
            (Self::UnsupportedMediaType(_), _) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            (Self::Connection(_), ErrorPolicy::Distinguish) => StatusCode::BAD_GATEWAY,
            (Self::Timeout(_), ErrorPolicy::Distinguish) => StatusCode::GATEWAY_TIMEOUT,
            (Self::Config(_) | Self::Connection(_) | Self::Timeout(_) | Self::Internal(_), _) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message that is safe to expose to API consumers
    pub fn client_message(&self, policy: ErrorPolicy) -> String {
        match (self, policy) {
            (Self::InvalidRequest { .. } | Self::UnsupportedMediaType(_), _) => self.to_string(),
            (Self::Connection(_), ErrorPolicy::Distinguish) => "Upstream unreachable".to_owned(),
            (Self::Timeout(_), ErrorPolicy::Distinguish) => "Upstream timed out".to_owned(),
            (Self::Config(_) | Self::Connection(_) | Self::Timeout(_) | Self::Internal(_), _) => {
                INTERNAL_MESSAGE.to_owned()
            }
        }
    }

    /// Render this error as a flat `{"error": ...}` response
    pub fn into_response_with(self, policy: ErrorPolicy) -> Response {
        let status = self.status_code(policy);
        let body = ErrorResponse {
            error: self.client_message(policy),
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        self.into_response_with(ErrorPolicy::default())
    }
}
