//! Payroll calculation using rust_decimal for precision
//!
//! Pure functions over attendance grouped by business day. Day rates are
//! stored as `f64` and converted to `Decimal` before any arithmetic. The
//! rate itself is never rounded; only pay totals are rounded to 2 decimal
//! places (midpoint away from zero).
//!
//! A day is paid only when it holds at least one `in` and one `out`. A paid
//! day with any half-day flag counts 0.5, otherwise 1.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use shared::models::{
    AttendanceRecord, ClockType, DayAttendance, DayKind, Employee, MonthlyReport, MonthlyStat,
};


/// Rounding for monetary values (2 decimal places)
const DECIMAL_PLACES: u32 = 2;

/// Weight of a half day
const HALF: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in payroll calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round to 2 decimal places, midpoint away from zero
#[inline]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Classify one day's records
pub fn summarize_day(records: &[AttendanceRecord]) -> DayKind {
    let has_in = records.iter().any(|r| r.clock_type == ClockType::In);
    let has_out = records.iter().any(|r| r.clock_type == ClockType::Out);
    if !(has_in && has_out) {
        return DayKind::Incomplete;
    }
    if records.iter().any(|r| r.is_half_day) {
        DayKind::Half
    } else {
        DayKind::Full
    }
}

/// Count full and half days
pub fn count_days(days: &BTreeMap<NaiveDate, Vec<AttendanceRecord>>) -> (u32, u32) {
    days.values()
        .fold((0, 0), |(full, half), records| match summarize_day(records) {
            DayKind::Full => (full + 1, half),
            DayKind::Half => (full, half + 1),
            DayKind::Incomplete => (full, half),
        })
}

/// `full + 0.5 * half`
pub fn days_worked(full_days: u32, half_days: u32) -> Decimal {
    Decimal::from(full_days) + HALF * Decimal::from(half_days)
}

/// `round2(days_worked * day_rate)`
pub fn total_pay(days_worked: Decimal, day_rate: Decimal) -> Decimal {
    round2(days_worked * day_rate)
}

/// Monthly figures for one employee from their grouped days
pub fn monthly_stat(
    employee: &Employee,
    days: &BTreeMap<NaiveDate, Vec<AttendanceRecord>>,
) -> MonthlyStat {
    let (full_days, half_days) = count_days(days);
    let day_rate = to_decimal(employee.day_rate);
    let worked = days_worked(full_days, half_days);

    MonthlyStat {
        employee_id: employee.id,
        employee_code: employee.employee_code.clone(),
        name: employee.name.clone(),
        day_rate,
        full_days,
        half_days,
        days_worked: worked,
        total_pay: total_pay(worked, day_rate),
    }
}

/// Aggregate per-employee figures into a report
pub fn aggregate(month: &str, employees: Vec<MonthlyStat>) -> MonthlyReport {
    let total_work_days: Decimal = employees.iter().map(|s| s.days_worked).sum();
    let total_salary = round2(employees.iter().map(|s| s.total_pay).sum());

    MonthlyReport {
        month: month.to_string(),
        total_employees: employees.len() as u32,
        total_work_days,
        total_salary,
        employees,
    }
}

/// Day-by-day view, newest day first
pub fn day_breakdown(days: BTreeMap<NaiveDate, Vec<AttendanceRecord>>) -> Vec<DayAttendance> {
    days.into_iter()
        .rev()
        .map(|(date, records)| DayAttendance {
            date,
            kind: summarize_day(&records),
            records,
        })
        .collect()
}
