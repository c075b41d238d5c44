//! 管理员鉴权模块
//!
//! - [`AdminGate`] - 校验管理员凭证，签发 [`AdminAccess`]
//! - [`AdminAccess`] - 管理员能力凭据，所有变更操作都需要它
//! - [`require_admin`] - 管理接口中间件

pub mod extractor;
pub mod gate;
pub mod middleware;

pub use gate::{AdminAccess, AdminGate};
pub use middleware::require_admin;
