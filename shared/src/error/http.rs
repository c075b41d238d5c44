//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound
            | Self::EmployeeNotFound
            | Self::AttendanceRecordNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::EmployeeCodeExists
            | Self::EnrollmentConflict
            | Self::EmployeeAlreadyEnrolled
            | Self::DayAlreadyComplete
            | Self::ConcurrentClockEvent => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,

            // 422 Unprocessable (sequence rule)
            Self::InvalidClockTransition | Self::VerificationFailed => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 504 Gateway Timeout (device did not answer)
            Self::SensorTimeout => StatusCode::GATEWAY_TIMEOUT,

            // 502 Bad Gateway (device misbehaved)
            Self::SensorUnavailable | Self::SensorProtocolError => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::ValidationFailed => StatusCode::BAD_REQUEST,
        }
    }
}
