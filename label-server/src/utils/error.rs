//! Unified error handling
//!
//! Application error type and response envelope:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response structure
//!
//! # Error codes
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx | Request errors | E0002 validation failed |
//! | E8xxx | Downstream errors | E8001 upstream warehouse error |
//! | E9xxx | System errors | E9001 internal error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use label_engine::LabelError;
use serde::Serialize;
use tracing::error;

use crate::warehouse::WarehouseError;

/// Uniform API response envelope
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 on success)
    pub code: String,
    /// Message
    pub message: String,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Request errors (4xx) ==========
    #[error("Validation failed: {0}")]
    /// Bad request body or query (400)
    Validation(String),

    #[error("Resource not found: {0}")]
    /// Resource does not exist (404)
    NotFound(String),

    // ========== Downstream errors (5xx) ==========
    #[error("Upstream error: {0}")]
    /// Warehouse API failure (502)
    Upstream(String),

    #[error("Printer error: {0}")]
    /// Printer transport or spooler failure (502)
    Printer(String),

    // ========== System errors (5xx) ==========
    #[error("Internal server error: {0}")]
    /// Internal error (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),

            AppError::Upstream(msg) => {
                error!(target: "upstream", error = %msg, "Upstream request failed");
                (StatusCode::BAD_GATEWAY, "E8001", "Warehouse request failed".to_string())
            }
            AppError::Printer(msg) => {
                error!(target: "printer", error = %msg, "Printer dispatch failed");
                (StatusCode::BAD_GATEWAY, "E8002", msg.clone())
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9001", "Internal server error".to_string())
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<LabelError> for AppError {
    fn from(e: LabelError) -> Self {
        match e {
            // Caller-facing input problems keep their message.
            LabelError::Input { .. } | LabelError::Encoding { .. } => {
                AppError::Validation(e.to_string())
            }
            LabelError::Connection(_) | LabelError::Timeout(_) | LabelError::Spooler(_) => {
                AppError::Printer(e.to_string())
            }
            LabelError::Asset(_) | LabelError::Io(_) | LabelError::Document(_) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<WarehouseError> for AppError {
    fn from(e: WarehouseError) -> Self {
        match e {
            WarehouseError::BadOrderNo(raw) => {
                AppError::Validation(format!("Invalid originalOrderNo: {:?}", raw))
            }
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_input_errors_are_client_errors() {
        let err: AppError = LabelError::Input {
            record_id: "100".to_string(),
            field: "sku",
        }
        .into();
        assert!(matches!(err, AppError::Validation(_)));

        let err: AppError = LabelError::Timeout("10.0.0.5:9100".to_string()).into();
        assert!(matches!(err, AppError::Printer(_)));
    }

    #[test]
    fn test_bad_order_no_maps_to_validation() {
        let err: AppError = WarehouseError::BadOrderNo("abc".to_string()).into();
        assert!(matches!(err, AppError::Validation(_)));

        let err: AppError = WarehouseError::Status {
            status: 502,
            details: "bad gateway".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
