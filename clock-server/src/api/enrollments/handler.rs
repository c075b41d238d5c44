//! Enrollment API Handlers

use std::collections::BTreeSet;

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Employee, EnrollmentEntry, EnrollmentId, EnrollmentRegister};

use crate::auth::AdminAccess;
use crate::core::ServerState;
use crate::reconcile::{EnrollOutcome, EnrollmentRemoval};
use crate::utils::{AppError, AppResult};

/// GET /api/enrollments - 传感器上的指纹及其所属员工
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<EnrollmentEntry>>> {
    let entries = state.coordinator.list_enrollments().await?;
    Ok(Json(entries))
}

/// POST /api/enrollments - 录入指纹，暂不关联员工
pub async fn enroll(
    State(state): State<ServerState>,
    admin: AdminAccess,
) -> AppResult<Json<EnrollOutcome>> {
    let outcome = state.coordinator.enroll_fingerprint(&admin, None).await?;
    Ok(Json(outcome))
}

/// POST /api/enrollments/register - 为已录入的指纹创建员工
pub async fn register(
    State(state): State<ServerState>,
    admin: AdminAccess,
    Json(payload): Json<EnrollmentRegister>,
) -> AppResult<Json<Employee>> {
    let employee = state
        .coordinator
        .register_employee(&admin, payload.employee, Some(payload.enrollment_id))
        .await?;
    Ok(Json(employee))
}

/// GET /api/enrollments/orphans - 无员工关联的指纹
pub async fn orphans(State(state): State<ServerState>) -> AppResult<Json<BTreeSet<EnrollmentId>>> {
    let orphans = state.coordinator.list_orphans().await?;
    Ok(Json(orphans))
}

/// DELETE /api/enrollments/{enrollment_id} - 删除传感器指纹并解除关联
pub async fn delete(
    State(state): State<ServerState>,
    admin: AdminAccess,
    Path(enrollment_id): Path<String>,
) -> AppResult<Json<EnrollmentRemoval>> {
    let enrollment_id = enrollment_id.trim();
    if enrollment_id.is_empty() {
        return Err(AppError::validation("enrollment_id must not be empty"));
    }
    let removal = state
        .coordinator
        .delete_enrollment(&admin, &EnrollmentId::from(enrollment_id))
        .await?;
    Ok(Json(removal))
}
