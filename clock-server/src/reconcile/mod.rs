//! Reconciliation Coordinator
//!
//! Runs the flows that touch both the sensor and the store. Store writes
//! only follow a device success; when the device fails after the store was
//! already changed (or the store refuses after the device succeeded) the
//! flow reports it as an outcome instead of rolling back.
//!
//! Mutating flows take an [`AdminAccess`]; verification is open to the
//! kiosk.

mod outcome;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono_tz::Tz;
use shared::models::{
    AttendanceRecord, Employee, EmployeeCreate, EmployeeMonth, EmployeeUpdate, EnrollmentEntry,
    EnrollmentId, ManualRecordCreate, MonthlyReport, RecordEdit,
};
use sqlx::SqlitePool;

pub use outcome::{DeleteOutcome, EnrollOutcome, EnrollmentRemoval, VerifyOutcome};

use crate::auth::AdminAccess;
use crate::db::repository::{RepoError, SortOrder, employee};
use crate::device::{DeviceError, SensorGate};
use crate::enrollment::{EnrollmentRegistry, RegistryError};
use crate::ledger::{self, AttendanceLedger, LedgerError};
use crate::payroll;
use crate::utils::validation::{
    MAX_NAME_LEN, normalize_optional, validate_day_rate, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode, time};

pub struct ReconciliationCoordinator {
    pool: SqlitePool,
    registry: EnrollmentRegistry,
    ledger: Arc<AttendanceLedger>,
    gate: SensorGate,
    tz: Tz,
}

impl ReconciliationCoordinator {
    pub fn new(pool: SqlitePool, gate: SensorGate, tz: Tz) -> Self {
        Self {
            registry: EnrollmentRegistry::new(pool.clone()),
            ledger: Arc::new(AttendanceLedger::new(pool.clone(), tz)),
            pool,
            gate,
            tz,
        }
    }

    pub fn ledger(&self) -> &AttendanceLedger {
        &self.ledger
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    // ==================== Enrollment ====================

    /// Capture a new fingerprint, linking it to `employee_id` when given.
    ///
    /// The employee is checked before the device is touched. A link that
    /// fails after the device stored the template yields
    /// [`EnrollOutcome::Orphaned`].
    pub async fn enroll_fingerprint(
        &self,
        _admin: &AdminAccess,
        employee_id: Option<i64>,
    ) -> AppResult<EnrollOutcome> {
        if let Some(id) = employee_id {
            let target = self.require_employee(id).await?;
            if let Some(current) = target.enrollment_id {
                return Err(RegistryError::AlreadyEnrolled {
                    employee_id: id,
                    current,
                }
                .into());
            }
        }

        let enrollment_id = self.gate.enroll().await?;
        tracing::info!(enrollment_id = %enrollment_id, ?employee_id, "Fingerprint enrolled on sensor");

        let Some(employee_id) = employee_id else {
            return Ok(EnrollOutcome::Unassigned { enrollment_id });
        };

        match self.registry.link(employee_id, &enrollment_id).await {
            Ok(employee) => Ok(EnrollOutcome::Linked { employee }),
            Err(e) => Ok(self.orphaned(enrollment_id, AppError::from(e))),
        }
    }

    /// Create an employee, optionally holding an enrollment that is already
    /// on the device. Nothing is created when the enrollment is taken.
    pub async fn register_employee(
        &self,
        _admin: &AdminAccess,
        create: EmployeeCreate,
        enrollment_id: Option<EnrollmentId>,
    ) -> AppResult<Employee> {
        let create = validate_create(create)?;

        if let Some(id) = &enrollment_id
            && let Some(owner) = self.registry.find_by_enrollment_id(id).await?
        {
            return Err(RegistryError::EnrollmentTaken {
                enrollment_id: id.clone(),
                owner: owner.id,
            }
            .into());
        }

        let employee = employee::create(&self.pool, create, enrollment_id.as_ref())
            .await
            .map_err(|e| match (e, &enrollment_id) {
                (RepoError::Duplicate(msg), Some(id)) => {
                    AppError::with_message(ErrorCode::EnrollmentConflict, msg)
                        .with_detail("enrollment_id", id.as_str())
                }
                (e, _) => e.into(),
            })?;

        tracing::info!(
            employee_id = employee.id,
            employee_code = %employee.employee_code,
            enrollment_id = ?employee.enrollment_id,
            "Employee registered"
        );
        Ok(employee)
    }

    /// Capture a fingerprint and create the employee holding it
    pub async fn enroll_and_register(
        &self,
        _admin: &AdminAccess,
        create: EmployeeCreate,
    ) -> AppResult<EnrollOutcome> {
        let create = validate_create(create)?;

        let enrollment_id = self.gate.enroll().await?;
        tracing::info!(enrollment_id = %enrollment_id, "Fingerprint enrolled on sensor");

        match employee::create(&self.pool, create, Some(&enrollment_id)).await {
            Ok(employee) => {
                tracing::info!(
                    employee_id = employee.id,
                    employee_code = %employee.employee_code,
                    enrollment_id = %enrollment_id,
                    "Employee registered"
                );
                Ok(EnrollOutcome::Linked { employee })
            }
            Err(e) => Ok(self.orphaned(enrollment_id, AppError::from(e))),
        }
    }

    /// Remove a template from the device, then drop the employee's reference
    ///
    /// A device failure leaves the store untouched.
    pub async fn delete_enrollment(
        &self,
        _admin: &AdminAccess,
        enrollment_id: &EnrollmentId,
    ) -> AppResult<EnrollmentRemoval> {
        self.gate.delete(enrollment_id).await?;
        let released_from = self.registry.release(enrollment_id).await?;
        tracing::info!(enrollment_id = %enrollment_id, ?released_from, "Enrollment deleted");
        Ok(EnrollmentRemoval {
            enrollment_id: enrollment_id.clone(),
            released_from,
        })
    }

    /// Templates on the device with their employee, if any
    pub async fn list_enrollments(&self) -> AppResult<Vec<EnrollmentEntry>> {
        let device_ids = self.gate.list().await?;
        let linked: HashMap<EnrollmentId, Employee> =
            self.registry.list_linked().await?.into_iter().collect();

        Ok(device_ids
            .into_iter()
            .map(|id| {
                let owner = linked.get(&id);
                EnrollmentEntry {
                    employee_id: owner.map(|e| e.id),
                    employee_code: owner.map(|e| e.employee_code.clone()),
                    employee_name: owner.map(|e| e.name.clone()),
                    enrollment_id: id,
                }
            })
            .collect())
    }

    /// Device templates no employee references
    pub async fn list_orphans(&self) -> AppResult<BTreeSet<EnrollmentId>> {
        let device_ids = self.gate.list().await?;
        let orphans = self.registry.list_orphans(&device_ids).await?;
        if !orphans.is_empty() {
            tracing::info!(count = orphans.len(), "Orphaned enrollments on sensor");
        }
        Ok(orphans)
    }

    fn orphaned(&self, enrollment_id: EnrollmentId, err: AppError) -> EnrollOutcome {
        tracing::warn!(
            enrollment_id = %enrollment_id,
            code = %err.code,
            error = %err.message,
            "Orphaned enrollment: template stored on sensor but not linked"
        );
        EnrollOutcome::Orphaned {
            enrollment_id,
            reason: err.message,
        }
    }

    // ==================== Verification ====================

    pub async fn verify_and_clock(&self) -> AppResult<VerifyOutcome> {
        self.verify_and_clock_at(shared::util::now_millis()).await
    }

    /// Verify a finger and record the next clock event at `at`
    pub async fn verify_and_clock_at(&self, at: i64) -> AppResult<VerifyOutcome> {
        let enrollment_id = match self.gate.verify().await {
            Ok(id) => id,
            Err(DeviceError::NoMatch) => {
                tracing::info!("Fingerprint verification failed");
                return Ok(VerifyOutcome::VerificationFailed);
            }
            Err(DeviceError::Timeout(_)) => return Ok(VerifyOutcome::DeviceTimeout),
            Err(e) => return Err(e.into()),
        };

        let Some(employee) = self.registry.find_by_enrollment_id(&enrollment_id).await? else {
            tracing::warn!(enrollment_id = %enrollment_id, "Verified fingerprint has no employee");
            return Ok(VerifyOutcome::UnregisteredFingerprint { enrollment_id });
        };

        match self.ledger.clock(employee.id, at).await {
            Ok(record) => Ok(VerifyOutcome::Success {
                employee,
                clock_type: record.clock_type,
                timestamp: record.timestamp,
            }),
            Err(LedgerError::DayAlreadyComplete { .. }) => {
                tracing::info!(employee_id = employee.id, "Already clocked in and out today");
                Ok(VerifyOutcome::AlreadyCompletedToday { employee })
            }
            Err(e) => Err(e.into()),
        }
    }

    // ==================== Employees ====================

    pub async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        Ok(employee::find_all(&self.pool).await?)
    }

    pub async fn get_employee(&self, employee_id: i64) -> AppResult<Employee> {
        self.require_employee(employee_id).await
    }

    /// Profile edit; the enrollment reference is not touched
    pub async fn update_employee(
        &self,
        _admin: &AdminAccess,
        employee_id: i64,
        update: EmployeeUpdate,
    ) -> AppResult<Employee> {
        let update = validate_update(update)?;
        match employee::update(&self.pool, employee_id, update).await {
            Ok(employee) => {
                tracing::info!(employee_id, "Employee updated");
                Ok(employee)
            }
            Err(RepoError::NotFound(_)) => Err(RegistryError::EmployeeNotFound(employee_id).into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the employee and their records, then the device template.
    ///
    /// The store deletion is never rolled back; a device failure is reported
    /// as [`DeleteOutcome::SuccessWithDeviceWarning`].
    pub async fn delete_employee(
        &self,
        _admin: &AdminAccess,
        employee_id: i64,
    ) -> AppResult<DeleteOutcome> {
        let target = self.require_employee(employee_id).await?;

        if !employee::delete(&self.pool, employee_id).await? {
            return Err(RegistryError::EmployeeNotFound(employee_id).into());
        }
        tracing::info!(employee_id, "Employee deleted with attendance records");

        let Some(enrollment_id) = target.enrollment_id else {
            return Ok(DeleteOutcome::FullySuccess);
        };

        match self.gate.delete(&enrollment_id).await {
            Ok(()) => {
                tracing::info!(employee_id, enrollment_id = %enrollment_id, "Template removed from sensor");
                Ok(DeleteOutcome::FullySuccess)
            }
            Err(e) => {
                tracing::warn!(
                    employee_id,
                    enrollment_id = %enrollment_id,
                    error = %e,
                    "Employee deleted but sensor template could not be removed"
                );
                Ok(DeleteOutcome::SuccessWithDeviceWarning {
                    enrollment_id,
                    warning: e.to_string(),
                })
            }
        }
    }

    async fn require_employee(&self, employee_id: i64) -> AppResult<Employee> {
        employee::find_by_id(&self.pool, employee_id)
            .await?
            .ok_or_else(|| RegistryError::EmployeeNotFound(employee_id).into())
    }

    // ==================== Manual adjustments ====================

    /// Operator record at `date` + `time` in the business time zone.
    /// The daily sequence is not enforced.
    pub async fn manual_append(
        &self,
        _admin: &AdminAccess,
        data: ManualRecordCreate,
    ) -> AppResult<AttendanceRecord> {
        let date = time::parse_date(&data.date)?;
        let at = time::parse_time(&data.time)?;
        self.require_employee(data.employee_id).await?;

        let timestamp = time::date_time_to_millis(date, at, self.tz);
        Ok(self
            .ledger
            .insert(data.employee_id, data.clock_type, timestamp, data.is_half_day)
            .await?)
    }

    pub async fn edit_record(
        &self,
        _admin: &AdminAccess,
        record_id: i64,
        edit: RecordEdit,
    ) -> AppResult<AttendanceRecord> {
        Ok(self
            .ledger
            .edit(record_id, edit.clock_type, edit.is_half_day)
            .await?)
    }

    pub async fn delete_record(&self, _admin: &AdminAccess, record_id: i64) -> AppResult<()> {
        Ok(self.ledger.delete(record_id).await?)
    }

    // ==================== Reports ====================

    /// Payroll for every employee over the calendar month `YYYY-MM`
    pub async fn monthly_report(&self, month: &str) -> AppResult<MonthlyReport> {
        let first_day = time::parse_month(month)?;
        let (start, end) = time::month_bounds(first_day, self.tz);

        let employees = employee::find_all(&self.pool).await?;
        let mut by_employee: HashMap<i64, Vec<AttendanceRecord>> = HashMap::new();
        for record in self.ledger.query_range(start, end).await? {
            by_employee.entry(record.employee_id).or_default().push(record);
        }

        let stats = employees
            .iter()
            .map(|e| {
                let records = by_employee.remove(&e.id).unwrap_or_default();
                payroll::monthly_stat(e, &ledger::group_by_day(records, self.tz))
            })
            .collect();

        let report = payroll::aggregate(&time::month_key(first_day), stats);
        tracing::info!(
            month = %report.month,
            employees = report.total_employees,
            total_salary = %report.total_salary,
            "Monthly report generated"
        );
        Ok(report)
    }

    /// One employee's month, days newest first
    pub async fn employee_month(&self, employee_id: i64, month: &str) -> AppResult<EmployeeMonth> {
        let first_day = time::parse_month(month)?;
        let employee = self.require_employee(employee_id).await?;
        let (start, end) = time::month_bounds(first_day, self.tz);

        let records = self
            .ledger
            .query_by_employee_and_range(employee_id, start, end, SortOrder::Asc)
            .await?;
        let days = ledger::group_by_day(records, self.tz);
        let stat = payroll::monthly_stat(&employee, &days);

        Ok(EmployeeMonth {
            month: time::month_key(first_day),
            days: payroll::day_breakdown(days),
            employee,
            stat,
        })
    }
}

fn validate_create(create: EmployeeCreate) -> AppResult<EmployeeCreate> {
    validate_required_text(&create.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&create.department, "department", MAX_NAME_LEN)?;
    validate_optional_text(&create.position, "position", MAX_NAME_LEN)?;
    validate_day_rate(create.day_rate)?;

    Ok(EmployeeCreate {
        name: create.name.trim().to_string(),
        department: normalize_optional(create.department),
        position: normalize_optional(create.position),
        day_rate: create.day_rate,
    })
}

fn validate_update(update: EmployeeUpdate) -> AppResult<EmployeeUpdate> {
    if let Some(name) = &update.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&update.department, "department", MAX_NAME_LEN)?;
    validate_optional_text(&update.position, "position", MAX_NAME_LEN)?;
    if let Some(rate) = update.day_rate {
        validate_day_rate(rate)?;
    }

    Ok(EmployeeUpdate {
        name: update.name.map(|n| n.trim().to_string()),
        department: normalize_optional(update.department),
        position: normalize_optional(update.position),
        day_rate: update.day_rate,
    })
}
