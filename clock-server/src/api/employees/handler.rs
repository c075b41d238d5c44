//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{Employee, EmployeeCreate, EmployeeMonth, EmployeeUpdate};

use crate::api::MonthQuery;
use crate::auth::AdminAccess;
use crate::core::ServerState;
use crate::reconcile::{DeleteOutcome, EnrollOutcome};
use crate::utils::AppResult;

/// GET /api/employees - 员工列表 (按创建时间倒序)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Employee>>> {
    let employees = state.coordinator.list_employees().await?;
    Ok(Json(employees))
}

/// GET /api/employees/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Employee>> {
    let employee = state.coordinator.get_employee(id).await?;
    Ok(Json(employee))
}

/// POST /api/employees - 录入指纹并创建员工
pub async fn create(
    State(state): State<ServerState>,
    admin: AdminAccess,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<EnrollOutcome>> {
    let outcome = state.coordinator.enroll_and_register(&admin, payload).await?;
    Ok(Json(outcome))
}

/// PUT /api/employees/{id} - 修改资料 (不含指纹)
pub async fn update(
    State(state): State<ServerState>,
    admin: AdminAccess,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    let employee = state.coordinator.update_employee(&admin, id, payload).await?;
    Ok(Json(employee))
}

/// DELETE /api/employees/{id} - 删除员工、考勤记录及传感器指纹
pub async fn delete(
    State(state): State<ServerState>,
    admin: AdminAccess,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteOutcome>> {
    let outcome = state.coordinator.delete_employee(&admin, id).await?;
    Ok(Json(outcome))
}

/// POST /api/employees/{id}/enroll - 为已有员工录入指纹
pub async fn enroll(
    State(state): State<ServerState>,
    admin: AdminAccess,
    Path(id): Path<i64>,
) -> AppResult<Json<EnrollOutcome>> {
    let outcome = state.coordinator.enroll_fingerprint(&admin, Some(id)).await?;
    Ok(Json(outcome))
}

/// GET /api/employees/{id}/attendance?month=YYYY-MM
pub async fn attendance(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<EmployeeMonth>> {
    let month = query.resolve(&state);
    let view = state.coordinator.employee_month(id, &month).await?;
    Ok(Json(view))
}
