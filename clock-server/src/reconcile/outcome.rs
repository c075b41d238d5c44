//! Flow outcomes
//!
//! Results that are not errors from the caller's point of view: the flow
//! ran to completion but the device and the store may not fully agree.

use serde::Serialize;
use shared::models::{ClockType, Employee, EnrollmentId};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnrollOutcome {
    /// Template stored and linked to the employee
    Linked { employee: Employee },
    /// Template stored, no employee yet
    Unassigned { enrollment_id: EnrollmentId },
    /// Template stored on the device but could not be linked.
    /// The template is left on the device.
    Orphaned {
        enrollment_id: EnrollmentId,
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerifyOutcome {
    Success {
        employee: Employee,
        clock_type: ClockType,
        timestamp: i64,
    },
    VerificationFailed,
    UnregisteredFingerprint { enrollment_id: EnrollmentId },
    AlreadyCompletedToday { employee: Employee },
    DeviceTimeout,
}

impl VerifyOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            VerifyOutcome::Success { .. } => "success",
            VerifyOutcome::VerificationFailed => "verification_failed",
            VerifyOutcome::UnregisteredFingerprint { .. } => "unregistered_fingerprint",
            VerifyOutcome::AlreadyCompletedToday { .. } => "already_completed_today",
            VerifyOutcome::DeviceTimeout => "device_timeout",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeleteOutcome {
    FullySuccess,
    /// Employee and records are gone, the template may remain on the device
    SuccessWithDeviceWarning {
        enrollment_id: EnrollmentId,
        warning: String,
    },
}

/// Result of removing a template from the device
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentRemoval {
    pub enrollment_id: EnrollmentId,
    /// Employee that held the template, if any
    pub released_from: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_tagging() {
        let json = serde_json::to_value(VerifyOutcome::DeviceTimeout).unwrap();
        assert_eq!(json["status"], "device_timeout");

        let json = serde_json::to_value(EnrollOutcome::Unassigned {
            enrollment_id: "3".into(),
        })
        .unwrap();
        assert_eq!(json["status"], "unassigned");
        assert_eq!(json["enrollment_id"], "3");
    }

    #[test]
    fn test_label_matches_tag() {
        let outcome = VerifyOutcome::UnregisteredFingerprint {
            enrollment_id: "8".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], outcome.label());
    }
}
