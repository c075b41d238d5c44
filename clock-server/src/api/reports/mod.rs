//! 薪资报表路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/reports/monthly?month=YYYY-MM | GET | 月度出勤与薪资 | 管理员 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/monthly", get(handler::monthly))
}
