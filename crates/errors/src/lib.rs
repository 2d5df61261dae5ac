//! almacen-errors - unified error handling
//!
//! One error taxonomy for every layer, with a stable HTTP mapping.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Unauthenticated(_) => 401,
            Self::Forbidden(_) => 403,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
            Self::Database(_) => 500,
        }
    }

    /// Whether this error exposes raw detail to the caller
    ///
    /// Validation and not-found messages are user-facing; infrastructure
    /// errors surface only a generic message plus an `error` field.
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// The short message shown to the caller
    pub fn public_message(&self) -> String {
        if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            match self {
                Self::NotFound(msg)
                | Self::Validation(msg)
                | Self::Unauthorized(msg)
                | Self::Unauthenticated(msg)
                | Self::Forbidden(msg)
                | Self::Conflict(msg) => msg.clone(),
                _ => self.to_string(),
            }
        }
    }

    /// Render as the wire-level error body
    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            message: self.public_message(),
            error: if self.is_server_error() {
                Some(self.to_string())
            } else {
                None
            },
        }
    }
}

/// JSON body returned on error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::not_found("x").status_code(), 404);
        assert_eq!(AppError::validation("x").status_code(), 400);
        assert_eq!(AppError::unauthenticated("x").status_code(), 401);
        assert_eq!(AppError::forbidden("x").status_code(), 403);
        assert_eq!(AppError::conflict("x").status_code(), 409);
        assert_eq!(AppError::database("x").status_code(), 500);
        assert_eq!(AppError::internal("x").status_code(), 500);
    }

    #[test]
    fn test_validation_message_is_public() {
        let err = AppError::validation("quantity cannot be zero");
        let body = err.to_error_body();
        assert!(!body.success);
        assert_eq!(body.message, "quantity cannot be zero");
        assert!(body.error.is_none());
    }

    #[test]
    fn test_database_detail_goes_to_error_field() {
        let err = AppError::database("connection refused");
        let body = err.to_error_body();
        assert_eq!(body.message, "Internal server error");
        assert_eq!(body.error.as_deref(), Some("Database error: connection refused"));
    }
}
