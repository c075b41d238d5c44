//! 统一错误处理
//!
//! Re-exports the shared error system and maps every component error of
//! the server onto an [`AppError`] with a stable [`ErrorCode`].

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::db::repository::RepoError;
use crate::device::DeviceError;
use crate::enrollment::RegistryError;
use crate::ledger::LedgerError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::CodeExhausted(msg) => {
                AppError::with_message(ErrorCode::EmployeeCodeExists, msg)
            }
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        let message = err.to_string();
        match err {
            RegistryError::EmployeeNotFound(id) => {
                AppError::new(ErrorCode::EmployeeNotFound).with_detail("employee_id", id)
            }
            RegistryError::EnrollmentTaken {
                enrollment_id,
                owner,
            } => AppError::with_message(ErrorCode::EnrollmentConflict, message)
                .with_detail("enrollment_id", enrollment_id.as_str())
                .with_detail("owner_id", owner),
            RegistryError::AlreadyEnrolled {
                employee_id,
                current,
            } => AppError::with_message(ErrorCode::EmployeeAlreadyEnrolled, message)
                .with_detail("employee_id", employee_id)
                .with_detail("enrollment_id", current.as_str()),
            RegistryError::Repo(e) => e.into(),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::DayAlreadyComplete { employee_id, date } => {
                AppError::new(ErrorCode::DayAlreadyComplete)
                    .with_detail("employee_id", employee_id)
                    .with_detail("date", date.to_string())
            }
            LedgerError::InvalidTransition { requested, expected } => {
                AppError::with_message(ErrorCode::InvalidClockTransition, message)
                    .with_detail("requested", requested.as_str())
                    .with_detail("expected", expected.as_str())
            }
            LedgerError::RecordNotFound(id) => {
                AppError::new(ErrorCode::AttendanceRecordNotFound).with_detail("record_id", id)
            }
            LedgerError::ConcurrentAppend { employee_id, date } => {
                AppError::new(ErrorCode::ConcurrentClockEvent)
                    .with_detail("employee_id", employee_id)
                    .with_detail("date", date.to_string())
            }
            LedgerError::Repo(e) => e.into(),
        }
    }
}

impl From<DeviceError> for AppError {
    fn from(err: DeviceError) -> Self {
        let code = match &err {
            DeviceError::NoMatch => ErrorCode::VerificationFailed,
            DeviceError::Timeout(_) => ErrorCode::SensorTimeout,
            DeviceError::InvalidResponse(_) => ErrorCode::SensorProtocolError,
            DeviceError::Unavailable(_) | DeviceError::Aborted => ErrorCode::SensorUnavailable,
        };
        AppError::with_message(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_repo_error_codes() {
        let err = AppError::from(RepoError::CodeExhausted("5 attempts".into()));
        assert_eq!(err.code, ErrorCode::EmployeeCodeExists);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

        let err = AppError::from(RepoError::Duplicate("x".into()));
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        let err = AppError::from(RepoError::Validation("bad rate".into()));
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_ledger_error_codes() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 5).unwrap();
        let err = AppError::from(LedgerError::DayAlreadyComplete {
            employee_id: 7,
            date,
        });
        assert_eq!(err.code, ErrorCode::DayAlreadyComplete);
        assert_eq!(err.details.unwrap().get("date").unwrap(), "2024-05-05");

        let err = AppError::from(LedgerError::RecordNotFound(9));
        assert_eq!(err.code, ErrorCode::AttendanceRecordNotFound);
    }

    #[test]
    fn test_device_error_codes() {
        assert_eq!(
            AppError::from(DeviceError::Timeout("verify".into())).code,
            ErrorCode::SensorTimeout
        );
        assert_eq!(
            AppError::from(DeviceError::Aborted).code,
            ErrorCode::SensorUnavailable
        );
    }
}
