//! Employee Model

use super::EnrollmentId;
use serde::{Deserialize, Serialize};

/// Employee row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    /// Human-facing code, "EMP" + 6 digits
    pub employee_code: String,
    pub name: String,
    pub department: Option<String>,
    pub position: Option<String>,
    /// Pay for one full attendance day
    pub day_rate: f64,
    /// Fingerprint enrolled on the sensor, absent when not enrolled
    pub enrollment_id: Option<EnrollmentId>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Employee {
    pub fn is_enrolled(&self) -> bool {
        self.enrollment_id.is_some()
    }
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub name: String,
    pub department: Option<String>,
    pub position: Option<String>,
    #[serde(default)]
    pub day_rate: f64,
}

/// Update employee payload
///
/// The enrollment reference is managed by the enrollment endpoints only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub day_rate: Option<f64>,
}
