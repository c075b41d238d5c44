//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Attendance errors
//! - 7xxx: Sensor device errors
//! - 8xxx: Employee / enrollment errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Admin credential is invalid
    InvalidCredentials = 1002,

    // ==================== 4xxx: Attendance ====================
    /// Attendance record not found
    AttendanceRecordNotFound = 4001,
    /// Employee already clocked in and out today
    DayAlreadyComplete = 4002,
    /// Clock type does not follow the in -> out sequence
    InvalidClockTransition = 4003,
    /// Another append for the same employee/day won the race
    ConcurrentClockEvent = 4004,

    // ==================== 7xxx: Sensor ====================
    /// Fingerprint did not match any enrollment
    VerificationFailed = 7001,
    /// Sensor did not answer in time
    SensorTimeout = 7002,
    /// Sensor rejected the operation or is unreachable
    SensorUnavailable = 7003,
    /// Sensor answered with an unexpected payload
    SensorProtocolError = 7004,

    // ==================== 8xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// Employee code already exists
    EmployeeCodeExists = 8002,
    /// Enrollment is linked to another employee
    EnrollmentConflict = 8101,
    /// Employee already holds an enrollment
    EmployeeAlreadyEnrolled = 8102,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Auth
            ErrorCode::NotAuthenticated => "Administrator login required",
            ErrorCode::InvalidCredentials => "Invalid administrator credential",

            // Attendance
            ErrorCode::AttendanceRecordNotFound => "Attendance record not found",
            ErrorCode::DayAlreadyComplete => "Already clocked in and out today",
            ErrorCode::InvalidClockTransition => "Clock event is out of sequence",
            ErrorCode::ConcurrentClockEvent => "Another clock event was recorded concurrently",

            // Sensor
            ErrorCode::VerificationFailed => "Fingerprint verification failed",
            ErrorCode::SensorTimeout => "Fingerprint sensor did not respond in time",
            ErrorCode::SensorUnavailable => "Fingerprint sensor is unavailable",
            ErrorCode::SensorProtocolError => "Fingerprint sensor returned an invalid response",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeCodeExists => "Employee code already exists",
            ErrorCode::EnrollmentConflict => "Fingerprint is linked to another employee",
            ErrorCode::EmployeeAlreadyEnrolled => "Employee already has a fingerprint enrolled",

            // System
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),

            // Attendance
            4001 => Ok(ErrorCode::AttendanceRecordNotFound),
            4002 => Ok(ErrorCode::DayAlreadyComplete),
            4003 => Ok(ErrorCode::InvalidClockTransition),
            4004 => Ok(ErrorCode::ConcurrentClockEvent),

            // Sensor
            7001 => Ok(ErrorCode::VerificationFailed),
            7002 => Ok(ErrorCode::SensorTimeout),
            7003 => Ok(ErrorCode::SensorUnavailable),
            7004 => Ok(ErrorCode::SensorProtocolError),

            // Employee
            8001 => Ok(ErrorCode::EmployeeNotFound),
            8002 => Ok(ErrorCode::EmployeeCodeExists),
            8101 => Ok(ErrorCode::EnrollmentConflict),
            8102 => Ok(ErrorCode::EmployeeAlreadyEnrolled),

            // System
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
