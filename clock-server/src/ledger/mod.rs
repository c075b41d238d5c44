//! Attendance Ledger
//!
//! Stores clock events and enforces the daily `in -> out` sequence for
//! device-driven writes. The state of a day is never stored; it is derived
//! from that day's records each time.
//!
//! | records of the day | state |
//! |--------------------|-------|
//! | none | `Empty` |
//! | exactly one `in` | `AwaitingOut` |
//! | anything else | `Complete` |
//!
//! Two entry points write records: [`AttendanceLedger::append`] /
//! [`AttendanceLedger::clock`] follow the sequence, while
//! [`AttendanceLedger::insert`] is the operator path and skips it.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use dashmap::DashMap;
use shared::models::{AttendanceRecord, ClockType, RecordSource};
use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::db::repository::{RepoError, SortOrder, attendance};
use crate::utils::time;

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Employee {employee_id} already clocked in and out on {date}")]
    DayAlreadyComplete { employee_id: i64, date: NaiveDate },

    #[error("Cannot clock {requested}, next event must be {expected}")]
    InvalidTransition {
        requested: ClockType,
        expected: ClockType,
    },

    #[error("Attendance record {0} not found")]
    RecordNotFound(i64),

    #[error("Attendance of employee {employee_id} on {date} changed concurrently")]
    ConcurrentAppend { employee_id: i64, date: NaiveDate },

    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Derived state of one employee's day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    Empty,
    AwaitingOut,
    Complete,
}

impl DayState {
    /// Derive from the day's records ordered by time ascending
    pub fn derive(records: &[AttendanceRecord]) -> Self {
        match records {
            [] => DayState::Empty,
            [only] if only.clock_type == ClockType::In => DayState::AwaitingOut,
            _ => DayState::Complete,
        }
    }

    /// The only event this state accepts, `None` once complete
    pub fn next_clock_type(&self) -> Option<ClockType> {
        match self {
            DayState::Empty => Some(ClockType::In),
            DayState::AwaitingOut => Some(ClockType::Out),
            DayState::Complete => None,
        }
    }
}

type DayKey = (i64, NaiveDate);

pub struct AttendanceLedger {
    pool: SqlitePool,
    tz: Tz,
    /// Serializes guarded writes per (employee, business day)
    day_locks: DashMap<DayKey, Arc<Mutex<()>>>,
}

impl AttendanceLedger {
    pub fn new(pool: SqlitePool, tz: Tz) -> Self {
        Self {
            pool,
            tz,
            day_locks: DashMap::new(),
        }
    }

    /// Business time zone defining calendar days
    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Guarded write of a specific clock type
    pub async fn append(
        &self,
        employee_id: i64,
        clock_type: ClockType,
        at: i64,
        is_half_day: bool,
    ) -> LedgerResult<AttendanceRecord> {
        self.guarded_write(employee_id, Some(clock_type), at, is_half_day)
            .await
    }

    /// Guarded write of whatever event the day expects next
    ///
    /// Resolving the type and writing happen under the same per-day lock.
    pub async fn clock(&self, employee_id: i64, at: i64) -> LedgerResult<AttendanceRecord> {
        self.guarded_write(employee_id, None, at, false).await
    }

    /// Day state of `employee_id` on the business day containing `at`
    pub async fn day_state(&self, employee_id: i64, at: i64) -> LedgerResult<DayState> {
        let date = time::local_date(at, self.tz);
        let (start, end) = time::day_bounds(date, self.tz);
        let records = self
            .query_by_employee_and_range(employee_id, start, end, SortOrder::Asc)
            .await?;
        Ok(DayState::derive(&records))
    }

    async fn guarded_write(
        &self,
        employee_id: i64,
        requested: Option<ClockType>,
        at: i64,
        is_half_day: bool,
    ) -> LedgerResult<AttendanceRecord> {
        let date = time::local_date(at, self.tz);
        let key = (employee_id, date);
        let lock = self
            .day_locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock().await;
            self.write_locked(employee_id, date, requested, at, is_half_day)
                .await
        };

        drop(lock);
        self.day_locks
            .remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    async fn write_locked(
        &self,
        employee_id: i64,
        date: NaiveDate,
        requested: Option<ClockType>,
        at: i64,
        is_half_day: bool,
    ) -> LedgerResult<AttendanceRecord> {
        let (start, end) = time::day_bounds(date, self.tz);
        let records = self
            .query_by_employee_and_range(employee_id, start, end, SortOrder::Asc)
            .await?;

        let state = DayState::derive(&records);
        let expected = state
            .next_clock_type()
            .ok_or(LedgerError::DayAlreadyComplete { employee_id, date })?;
        if let Some(requested) = requested
            && requested != expected
        {
            return Err(LedgerError::InvalidTransition {
                requested,
                expected,
            });
        }

        let record = AttendanceRecord {
            id: shared::util::snowflake_id(),
            employee_id,
            timestamp: at,
            clock_type: expected,
            is_half_day,
            source: RecordSource::Device,
        };

        let inserted = attendance::insert_if_day_count(
            &self.pool,
            &record,
            start,
            end,
            records.len() as i64,
        )
        .await?;
        if !inserted {
            return Err(LedgerError::ConcurrentAppend { employee_id, date });
        }

        tracing::info!(
            employee_id,
            clock_type = %record.clock_type,
            %date,
            "Clock event recorded"
        );
        Ok(record)
    }

    /// Operator write, no sequence check
    pub async fn insert(
        &self,
        employee_id: i64,
        clock_type: ClockType,
        at: i64,
        is_half_day: bool,
    ) -> LedgerResult<AttendanceRecord> {
        let record = AttendanceRecord {
            id: shared::util::snowflake_id(),
            employee_id,
            timestamp: at,
            clock_type,
            is_half_day,
            source: RecordSource::Manual,
        };
        attendance::insert(&self.pool, &record).await?;
        tracing::info!(
            employee_id,
            record_id = record.id,
            clock_type = %clock_type,
            "Manual attendance record inserted"
        );
        Ok(record)
    }

    /// Overwrite type and half-day flag, no sequence check
    pub async fn edit(
        &self,
        record_id: i64,
        clock_type: ClockType,
        is_half_day: bool,
    ) -> LedgerResult<AttendanceRecord> {
        match attendance::update_fields(&self.pool, record_id, clock_type, is_half_day).await {
            Ok(record) => {
                tracing::info!(record_id, clock_type = %clock_type, is_half_day, "Attendance record edited");
                Ok(record)
            }
            Err(RepoError::NotFound(_)) => Err(LedgerError::RecordNotFound(record_id)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, record_id: i64) -> LedgerResult<()> {
        if !attendance::delete(&self.pool, record_id).await? {
            return Err(LedgerError::RecordNotFound(record_id));
        }
        tracing::info!(record_id, "Attendance record deleted");
        Ok(())
    }

    /// Records of one employee in `[start, end]` (inclusive)
    pub async fn query_by_employee_and_range(
        &self,
        employee_id: i64,
        start: i64,
        end: i64,
        order: SortOrder,
    ) -> LedgerResult<Vec<AttendanceRecord>> {
        Ok(
            attendance::find_by_employee_and_range(&self.pool, employee_id, start, end, order)
                .await?,
        )
    }

    /// Records of all employees in `[start, end]` (inclusive)
    pub async fn query_range(&self, start: i64, end: i64) -> LedgerResult<Vec<AttendanceRecord>> {
        Ok(attendance::find_by_range(&self.pool, start, end).await?)
    }
}

/// Bucket records by business day; each bucket keeps the input order
pub fn group_by_day(
    records: Vec<AttendanceRecord>,
    tz: Tz,
) -> BTreeMap<NaiveDate, Vec<AttendanceRecord>> {
    let mut days: BTreeMap<NaiveDate, Vec<AttendanceRecord>> = BTreeMap::new();
    for record in records {
        days.entry(time::local_date(record.timestamp, tz))
            .or_default()
            .push(record);
    }
    days
}
