//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Carries a stable [`ErrorCode`], a human-readable message and optional
/// structured details (field names, conflicting ids, etc.).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// Error response body
///
/// - `code`: Error code
/// - `message`: Human-readable message
/// - `details`: Additional error details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Non-zero error code
    pub code: u16,
    /// Human-readable message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::error(&self);

        match self.code.category() {
            super::category::ErrorCategory::System => {
                tracing::error!(
                    code = %self.code,
                    message = %self.message,
                    "System error occurred"
                );
            }
            super::category::ErrorCategory::Device => {
                tracing::warn!(
                    code = %self.code,
                    message = %self.message,
                    "Sensor error returned to client"
                );
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::EmployeeNotFound);
        assert_eq!(err.code, ErrorCode::EmployeeNotFound);
        assert_eq!(err.message, "Employee not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::new(ErrorCode::EnrollmentConflict)
            .with_detail("enrollment_id", "17")
            .with_detail("employee_id", 42);

        let details = err.details.unwrap();
        assert_eq!(details.get("enrollment_id").unwrap(), "17");
        assert_eq!(details.get("employee_id").unwrap(), 42);
    }

    #[test]
    fn test_app_error_http_status() {
        assert_eq!(
            AppError::new(ErrorCode::DayAlreadyComplete).http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::not_authenticated().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::validation("bad month").http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::SensorTimeout, "sensor silent for 20s");
        assert_eq!(format!("{}", err), "sensor silent for 20s");
    }

    #[test]
    fn test_api_response_error() {
        let err = AppError::new(ErrorCode::EnrollmentConflict).with_detail("enrollment_id", "3");
        let response = ApiResponse::error(&err);

        assert_eq!(response.code, 8101);
        assert_eq!(response.message, "Fingerprint is linked to another employee");
        assert!(response.details.is_some());
    }

    #[test]
    fn test_api_response_serialize_skips_empty_details() {
        let response = ApiResponse::error(&AppError::new(ErrorCode::DatabaseError));
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("details"));
        assert!(json.contains("\"code\":9002"));
    }

    #[tokio::test]
    async fn test_into_response_status_and_body() {
        use axum::response::IntoResponse;

        let response = AppError::new(ErrorCode::EmployeeNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, 8001);
    }
}
