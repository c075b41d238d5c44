use std::sync::Arc;

use sensor_client::{FingerprintSensor, HttpSensor};

use crate::auth::AdminGate;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::device::SensorGate;
use crate::reconcile::ReconciliationCoordinator;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，可直接作为 axum 的 State。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | SQLite 连接池 |
/// | coordinator | 指纹/考勤/薪资协调器 |
/// | admin_gate | 管理员鉴权 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub coordinator: Arc<ReconciliationCoordinator>,
    pub admin_gate: Arc<AdminGate>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 打开数据库 (work_dir/database/attendance.db) 并执行迁移
    /// 2. 创建 HTTP 传感器客户端
    /// 3. 组装协调器与管理员鉴权
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path()).await?;
        let sensor = HttpSensor::with_timeout(&config.sensor_url, config.sensor_timeout())?;
        tracing::info!(
            sensor_url = %sensor.base_url(),
            timeout_ms = config.sensor_timeout_ms,
            timezone = %config.timezone,
            "Fingerprint sensor configured"
        );
        Ok(Self::with_sensor(config.clone(), db, Arc::new(sensor)))
    }

    /// 使用指定传感器组装状态 (测试使用脚本传感器)
    pub fn with_sensor(config: Config, db: DbService, sensor: Arc<dyn FingerprintSensor>) -> Self {
        let gate = SensorGate::new(sensor, config.sensor_timeout());
        let coordinator = ReconciliationCoordinator::new(db.pool.clone(), gate, config.timezone);
        let admin_gate = AdminGate::new(config.admin_token.clone());

        Self {
            coordinator: Arc::new(coordinator),
            admin_gate: Arc::new(admin_gate),
            config,
            db,
        }
    }

    pub fn coordinator(&self) -> &ReconciliationCoordinator {
        &self.coordinator
    }
}
