//! Attendance Model (打卡记录)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Clock event direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ClockType {
    In,
    Out,
}

impl ClockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl fmt::Display for ClockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum RecordSource {
    /// Written by a fingerprint verification
    Device,
    /// Entered by an administrator
    Manual,
}

/// Attendance record row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttendanceRecord {
    pub id: i64,
    pub employee_id: i64,
    /// Event time (Unix millis)
    pub timestamp: i64,
    pub clock_type: ClockType,
    pub is_half_day: bool,
    pub source: RecordSource,
}

/// Manual record payload
///
/// `date` is `YYYY-MM-DD`, `time` is `HH:MM` or `HH:MM:SS`, both read in
/// the business time zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualRecordCreate {
    pub employee_id: i64,
    pub date: String,
    pub time: String,
    pub clock_type: ClockType,
    #[serde(default)]
    pub is_half_day: bool,
}

/// Edit record payload (type and half-day flag only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEdit {
    pub clock_type: ClockType,
    #[serde(default)]
    pub is_half_day: bool,
}
