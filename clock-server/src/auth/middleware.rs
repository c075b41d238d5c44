//! 管理员鉴权中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// 管理员中间件
///
/// 从 `Authorization: Bearer <token>` 头提取凭证，交给 [`AdminGate`](super::AdminGate)
/// 校验，成功后将 [`AdminAccess`](super::AdminAccess) 注入请求扩展。
///
/// # 跳过鉴权的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `GET /api/health`
/// - `POST /api/attendance/clock` (打卡终端)
pub async fn require_admin(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let is_public = path == "/api/health"
        || (path == "/api/attendance/clock" && req.method() == http::Method::POST);
    if is_public {
        return Ok(next.run(req).await);
    }

    let credential = match bearer_token(&req) {
        Some(token) => token,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::not_authenticated());
        }
    };

    match state.admin_gate.authorize(credential) {
        Ok(access) => {
            req.extensions_mut().insert(access);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                method = req.method().to_string(),
                uri = format!("{:?}", req.uri())
            );
            Err(e)
        }
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
}
