//! Attendance API Module
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/attendance/clock | POST | 验证指纹并打卡 | 无 (打卡终端) |
//! | /api/attendance | POST | 手动补录 | 管理员 |
//! | /api/attendance/{id} | PUT | 修改记录 | 管理员 |
//! | /api/attendance/{id} | DELETE | 删除记录 | 管理员 |

mod handler;

use axum::{
    Router,
    routing::{post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attendance", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/clock", post(handler::clock))
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
}
