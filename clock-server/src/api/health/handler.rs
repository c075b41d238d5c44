use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    database: &'static str,
    timezone: String,
}

/// GET /api/health - 健康检查
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db.pool).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!(error = %e, "Health check: database unreachable");
            "error"
        }
    };

    Json(HealthResponse {
        status: if database == "ok" { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        timezone: state.config.timezone.to_string(),
    })
}
