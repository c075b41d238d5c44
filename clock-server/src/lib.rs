//! Clock Server - 指纹考勤与薪资核算服务
//!
//! # 架构概述
//!
//! - **指纹登记** (`enrollment`): 传感器模板与员工的一一对应
//! - **考勤账本** (`ledger`): 每日 in -> out 顺序与并发保护
//! - **薪资计算** (`payroll`): 基于考勤的全天/半天统计
//! - **传感器网关** (`device`): 串行化、带超时的设备调用
//! - **协调器** (`reconcile`): 设备与数据库之间的流程编排
//! - **HTTP API** (`api`): JSON 接口
//!
//! # 模块结构
//!
//! ```text
//! clock-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # 管理员鉴权
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # SQLite 连接池与仓储
//! ├── enrollment/    # 指纹登记表
//! ├── ledger/        # 考勤账本
//! ├── payroll/       # 薪资计算
//! ├── device/        # 传感器网关
//! ├── reconcile/     # 流程协调
//! └── utils/         # 错误、日志、时间、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod device;
pub mod enrollment;
pub mod ledger;
pub mod payroll;
pub mod reconcile;
pub mod utils;

// Re-export 公共类型
pub use auth::{AdminAccess, AdminGate};
pub use core::{Config, Server, ServerError, ServerState};
pub use reconcile::{DeleteOutcome, EnrollOutcome, ReconciliationCoordinator, VerifyOutcome};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境
///
/// 1. 加载 `.env`
/// 2. 创建工作目录 (WORK_DIR 及其 logs/)
/// 3. 初始化日志 (LOG_LEVEL / LOG_JSON，写入 work_dir/logs)
pub fn setup_environment() -> Result<Config, ServerError> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        log_dir.to_str(),
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   ________           __
  / ____/ /___  _____/ /__
 / /   / / __ \/ ___/ //_/
/ /___/ / /_/ / /__/ ,<
\____/_/\____/\___/_/|_|
    "#
    );
}
