//! Attendance Record Repository

use super::{RepoError, RepoResult, SortOrder, is_foreign_key_violation};
use shared::models::{AttendanceRecord, ClockType};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, employee_id, timestamp, clock_type, is_half_day, source";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<AttendanceRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM attendance_record WHERE id = ?");
    let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(record)
}

/// One employee's records with `start <= timestamp <= end`
pub async fn find_by_employee_and_range(
    pool: &SqlitePool,
    employee_id: i64,
    start_millis: i64,
    end_millis: i64,
    order: SortOrder,
) -> RepoResult<Vec<AttendanceRecord>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM attendance_record WHERE employee_id = ? AND timestamp >= ? AND timestamp <= ? ORDER BY timestamp {dir}, id {dir}",
        dir = order.sql()
    );
    let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(employee_id)
        .bind(start_millis)
        .bind(end_millis)
        .fetch_all(pool)
        .await?;
    Ok(records)
}

/// Every employee's records with `start <= timestamp <= end`, by employee then time
pub async fn find_by_range(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<AttendanceRecord>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM attendance_record WHERE timestamp >= ? AND timestamp <= ? ORDER BY employee_id, timestamp, id"
    );
    let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(start_millis)
        .bind(end_millis)
        .fetch_all(pool)
        .await?;
    Ok(records)
}

fn map_insert_error(err: sqlx::Error, employee_id: i64) -> RepoError {
    if is_foreign_key_violation(&err) {
        RepoError::NotFound(format!("Employee {employee_id} not found"))
    } else {
        err.into()
    }
}

/// Unconditional insert
pub async fn insert(pool: &SqlitePool, record: &AttendanceRecord) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO attendance_record (id, employee_id, timestamp, clock_type, is_half_day, source) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(record.id)
    .bind(record.employee_id)
    .bind(record.timestamp)
    .bind(record.clock_type)
    .bind(record.is_half_day)
    .bind(record.source)
    .execute(pool)
    .await
    .map_err(|e| map_insert_error(e, record.employee_id))?;
    Ok(())
}

/// Insert only while the employee still has `expected_count` records in
/// `[day_start, day_end]`.
///
/// Returns `false` when another write changed the day in between, in which
/// case nothing is inserted.
pub async fn insert_if_day_count(
    pool: &SqlitePool,
    record: &AttendanceRecord,
    day_start: i64,
    day_end: i64,
    expected_count: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "INSERT INTO attendance_record (id, employee_id, timestamp, clock_type, is_half_day, source) \
         SELECT ?1, ?2, ?3, ?4, ?5, ?6 \
         WHERE (SELECT COUNT(*) FROM attendance_record WHERE employee_id = ?2 AND timestamp >= ?7 AND timestamp <= ?8) = ?9",
    )
    .bind(record.id)
    .bind(record.employee_id)
    .bind(record.timestamp)
    .bind(record.clock_type)
    .bind(record.is_half_day)
    .bind(record.source)
    .bind(day_start)
    .bind(day_end)
    .bind(expected_count)
    .execute(pool)
    .await
    .map_err(|e| map_insert_error(e, record.employee_id))?;
    Ok(rows.rows_affected() > 0)
}

/// Overwrite type and half-day flag
pub async fn update_fields(
    pool: &SqlitePool,
    id: i64,
    clock_type: ClockType,
    is_half_day: bool,
) -> RepoResult<AttendanceRecord> {
    let rows = sqlx::query("UPDATE attendance_record SET clock_type = ?1, is_half_day = ?2 WHERE id = ?3")
        .bind(clock_type)
        .bind(is_half_day)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Attendance record {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Attendance record {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM attendance_record WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count_for_employee(pool: &SqlitePool, employee_id: i64) -> RepoResult<i64> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM attendance_record WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}
