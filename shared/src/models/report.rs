//! Payroll report models

use super::{AttendanceRecord, Employee};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classification of a single attendance day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    /// In and out present, no half-day flag
    Full,
    /// In and out present, at least one half-day flag
    Half,
    /// Missing in or out, not paid
    Incomplete,
}

/// Per-employee monthly payroll figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStat {
    pub employee_id: i64,
    pub employee_code: String,
    pub name: String,
    pub day_rate: Decimal,
    pub full_days: u32,
    pub half_days: u32,
    /// full + 0.5 * half
    pub days_worked: Decimal,
    /// days_worked * day_rate, rounded to 2 dp
    pub total_pay: Decimal,
}

/// Monthly report across all employees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// `YYYY-MM`
    pub month: String,
    pub employees: Vec<MonthlyStat>,
    pub total_employees: u32,
    pub total_work_days: Decimal,
    pub total_salary: Decimal,
}

/// One day of an employee's month view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAttendance {
    pub date: NaiveDate,
    pub kind: DayKind,
    pub records: Vec<AttendanceRecord>,
}

/// One employee's month: days newest first plus the payroll figures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeMonth {
    pub employee: Employee,
    pub month: String,
    pub days: Vec<DayAttendance>,
    pub stat: MonthlyStat,
}
