//! Employee Repository

use super::{RepoError, RepoResult, unique_violation};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate, EnrollmentId};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, employee_code, name, department, position, day_rate, enrollment_id, created_at, updated_at";

/// Attempts before giving up on a free employee code
const CODE_ATTEMPTS: u32 = 5;

fn validate_day_rate(rate: f64) -> RepoResult<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(RepoError::Validation(format!(
            "Day rate must be a non-negative number: {rate}"
        )));
    }
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let sql = format!("SELECT {COLUMNS} FROM employee WHERE id = ?");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

/// All employees, newest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let sql = format!("SELECT {COLUMNS} FROM employee ORDER BY created_at DESC, id DESC");
    let employees = sqlx::query_as::<_, Employee>(&sql).fetch_all(pool).await?;
    Ok(employees)
}

pub async fn find_by_enrollment_id(
    pool: &SqlitePool,
    enrollment_id: &EnrollmentId,
) -> RepoResult<Option<Employee>> {
    let sql = format!("SELECT {COLUMNS} FROM employee WHERE enrollment_id = ?");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(enrollment_id)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

/// Employees holding an enrollment, ordered by enrollment id
pub async fn find_enrolled(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM employee WHERE enrollment_id IS NOT NULL ORDER BY enrollment_id"
    );
    let employees = sqlx::query_as::<_, Employee>(&sql).fetch_all(pool).await?;
    Ok(employees)
}

/// Insert an employee, optionally already holding an enrollment.
///
/// The employee code is retried with a fresh value on collision. A taken
/// enrollment id fails with [`RepoError::Duplicate`] and inserts nothing.
pub async fn create(
    pool: &SqlitePool,
    data: EmployeeCreate,
    enrollment_id: Option<&EnrollmentId>,
) -> RepoResult<Employee> {
    validate_day_rate(data.day_rate)?;

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    for attempt in 0..CODE_ATTEMPTS {
        let code = shared::util::employee_code(attempt);
        let result = sqlx::query(
            "INSERT INTO employee (id, employee_code, name, department, position, day_rate, enrollment_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        )
        .bind(id)
        .bind(&code)
        .bind(&data.name)
        .bind(&data.department)
        .bind(&data.position)
        .bind(data.day_rate)
        .bind(enrollment_id)
        .bind(now)
        .execute(pool)
        .await;

        match result {
            Ok(_) => {
                return find_by_id(pool, id)
                    .await?
                    .ok_or_else(|| RepoError::Database("Failed to create employee".into()));
            }
            Err(e) => match unique_violation(&e).as_deref() {
                Some("employee.employee_code") => {
                    tracing::debug!(code = %code, attempt, "Employee code collision, retrying");
                    continue;
                }
                Some("employee.enrollment_id") => {
                    return Err(RepoError::Duplicate(format!(
                        "Enrollment {} is already linked",
                        enrollment_id.map(EnrollmentId::as_str).unwrap_or_default()
                    )));
                }
                _ => return Err(e.into()),
            },
        }
    }

    Err(RepoError::CodeExhausted(format!(
        "No free employee code after {CODE_ATTEMPTS} attempts"
    )))
}

/// Update profile fields; `None` keeps the stored value
pub async fn update(pool: &SqlitePool, id: i64, data: EmployeeUpdate) -> RepoResult<Employee> {
    if let Some(rate) = data.day_rate {
        validate_day_rate(rate)?;
    }
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "UPDATE employee SET name = COALESCE(?1, name), department = COALESCE(?2, department), position = COALESCE(?3, position), day_rate = COALESCE(?4, day_rate), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(&data.department)
    .bind(&data.position)
    .bind(data.day_rate)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Delete an employee; attendance records go with it (FK cascade)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Attach an enrollment when the employee holds none or already holds this one.
///
/// Returns whether a row matched. The UNIQUE index turns a concurrent link
/// of the same enrollment to another employee into [`RepoError::Duplicate`].
pub async fn set_enrollment(
    pool: &SqlitePool,
    employee_id: i64,
    enrollment_id: &EnrollmentId,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let result = sqlx::query(
        "UPDATE employee SET enrollment_id = ?1, updated_at = ?2 WHERE id = ?3 AND (enrollment_id IS NULL OR enrollment_id = ?1)",
    )
    .bind(enrollment_id)
    .bind(now)
    .bind(employee_id)
    .execute(pool)
    .await;

    match result {
        Ok(rows) => Ok(rows.rows_affected() > 0),
        Err(e) if unique_violation(&e).is_some() => Err(RepoError::Duplicate(format!(
            "Enrollment {enrollment_id} is already linked"
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Detach whatever enrollment the employee holds, returning it
pub async fn clear_enrollment(
    pool: &SqlitePool,
    employee_id: i64,
) -> RepoResult<Option<EnrollmentId>> {
    let Some(current) = find_by_id(pool, employee_id)
        .await?
        .and_then(|e| e.enrollment_id)
    else {
        return Ok(None);
    };

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE employee SET enrollment_id = NULL, updated_at = ?1 WHERE id = ?2 AND enrollment_id = ?3",
    )
    .bind(now)
    .bind(employee_id)
    .bind(&current)
    .execute(pool)
    .await?;

    Ok((rows.rows_affected() > 0).then_some(current))
}

/// Detach an enrollment from whichever employee holds it, returning that employee id
pub async fn release_enrollment(
    pool: &SqlitePool,
    enrollment_id: &EnrollmentId,
) -> RepoResult<Option<i64>> {
    let now = shared::util::now_millis();
    let owner: Option<(i64,)> = sqlx::query_as(
        "UPDATE employee SET enrollment_id = NULL, updated_at = ?1 WHERE enrollment_id = ?2 RETURNING id",
    )
    .bind(now)
    .bind(enrollment_id)
    .fetch_optional(pool)
    .await?;
    Ok(owner.map(|(id,)| id))
}
