//! Attendance API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{AttendanceRecord, ManualRecordCreate, RecordEdit};

use crate::auth::AdminAccess;
use crate::core::ServerState;
use crate::reconcile::VerifyOutcome;
use crate::utils::AppResult;

/// POST /api/attendance/clock - 验证指纹并记录下一次打卡
pub async fn clock(State(state): State<ServerState>) -> AppResult<Json<VerifyOutcome>> {
    let outcome = state.coordinator.verify_and_clock().await?;
    tracing::info!(outcome = outcome.label(), "Clock request handled");
    Ok(Json(outcome))
}

/// POST /api/attendance - 手动补录 (不校验当日顺序)
pub async fn create(
    State(state): State<ServerState>,
    admin: AdminAccess,
    Json(payload): Json<ManualRecordCreate>,
) -> AppResult<Json<AttendanceRecord>> {
    let record = state.coordinator.manual_append(&admin, payload).await?;
    Ok(Json(record))
}

/// PUT /api/attendance/{id} - 修改类型与半天标记
pub async fn update(
    State(state): State<ServerState>,
    admin: AdminAccess,
    Path(id): Path<i64>,
    Json(payload): Json<RecordEdit>,
) -> AppResult<Json<AttendanceRecord>> {
    let record = state.coordinator.edit_record(&admin, id, payload).await?;
    Ok(Json(record))
}

/// DELETE /api/attendance/{id}
pub async fn delete(
    State(state): State<ServerState>,
    admin: AdminAccess,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.coordinator.delete_record(&admin, id).await?;
    Ok(Json(true))
}
