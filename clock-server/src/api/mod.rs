//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`attendance`] - 打卡与考勤记录
//! - [`employees`] - 员工管理
//! - [`enrollments`] - 指纹登记管理
//! - [`reports`] - 薪资报表
//!
//! 除 `GET /api/health` 与 `POST /api/attendance/clock` 外，所有接口都需要
//! 管理员令牌。

pub mod attendance;
pub mod employees;
pub mod enrollments;
pub mod health;
pub mod reports;

use axum::{Router, middleware};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_admin;
use crate::core::ServerState;

/// Assemble every router with admin middleware, tracing and CORS
pub fn build_app(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(attendance::router())
        .merge(employees::router())
        .merge(enrollments::router())
        .merge(reports::router())
        // 管理员中间件 - Router 级别应用，require_admin 内部跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// `?month=YYYY-MM`, defaults to the current month
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    pub fn resolve(self, state: &ServerState) -> String {
        self.month.unwrap_or_else(|| {
            crate::utils::time::month_key(crate::utils::time::current_month(
                state.config.timezone,
            ))
        })
    }
}
