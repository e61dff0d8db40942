//! Error types for verso

use crate::negotiate::RejectReason;
use crate::version::ApiVersion;
use http::StatusCode;
use serde::Serialize;
use std::fmt;

/// Result type alias for verso operations
pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Standard API error type
///
/// Provides structured error responses following a consistent JSON format.
/// Negotiation rejections additionally carry the route's supported-version
/// list so a client can correct itself.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code
    pub status: StatusCode,
    /// Error type identifier
    pub error_type: String,
    /// Human-readable error message
    pub message: String,
    /// Supported versions for the target route, on negotiation rejections
    pub supported_versions: Option<Vec<ApiVersion>>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(
        status: StatusCode,
        error_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            error_type: error_type.into(),
            message: message.into(),
            supported_versions: None,
        }
    }

    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    /// Create a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    /// Create a 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }

    /// Create the client error for a negotiation rejection.
    ///
    /// All three reasons map to 400: the request as sent cannot be served,
    /// and retrying it unchanged would reproduce the outcome.
    pub fn rejection(reason: RejectReason, supported: Vec<ApiVersion>) -> Self {
        let message = match reason {
            RejectReason::AmbiguousInput => {
                "Request carries conflicting or malformed API version signals".to_string()
            }
            RejectReason::UnsupportedVersion => {
                "The requested API version is not supported by this route".to_string()
            }
            RejectReason::NoMatchingVariant => {
                "No API version was specified and no default applies".to_string()
            }
        };
        Self {
            status: StatusCode::BAD_REQUEST,
            error_type: reason.as_str().to_string(),
            message,
            supported_versions: Some(supported),
        }
    }

    /// Attach supported versions to an existing error
    pub fn with_supported_versions(mut self, versions: Vec<ApiVersion>) -> Self {
        self.supported_versions = Some(versions);
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}

impl std::error::Error for ApiError {}

/// JSON representation of API error response
#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_versions: Option<Vec<ApiVersion>>,
}

#[derive(Serialize)]
pub(crate) struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        Self {
            error: ErrorBody {
                error_type: err.error_type,
                message: err.message,
            },
            supported_versions: err.supported_versions,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(format!("Invalid JSON: {}", err))
    }
}

impl From<hyper::Error> for ApiError {
    fn from(err: hyper::Error) -> Self {
        ApiError::internal(format!("HTTP error: {}", err))
    }
}
