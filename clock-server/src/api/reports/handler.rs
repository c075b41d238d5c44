use axum::{
    Json,
    extract::{Query, State},
};
use shared::models::MonthlyReport;

use crate::api::MonthQuery;
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/reports/monthly - 月度报表，默认当月
pub async fn monthly(
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<MonthlyReport>> {
    let month = query.resolve(&state);
    let report = state.coordinator.monthly_report(&month).await?;
    Ok(Json(report))
}
