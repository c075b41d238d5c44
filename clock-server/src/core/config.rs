use chrono_tz::Tz;
use std::path::PathBuf;
use std::time::Duration;

/// Default business time zone
pub const DEFAULT_TIMEZONE: &str = "Asia/Taipei";

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | SENSOR_URL | http://192.168.43.112 | 指纹传感器地址 |
/// | SENSOR_TIMEOUT_MS | 20000 | 单次传感器调用超时(毫秒) |
/// | TIMEZONE | Asia/Taipei | 业务时区 (定义"一天") |
/// | ADMIN_TOKEN | (未设置) | 管理员令牌，未设置时拒绝所有管理操作 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志格式 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/attendance ADMIN_TOKEN=secret cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 指纹传感器固件基础 URL
    pub sensor_url: String,
    /// 单次传感器调用超时 (毫秒)
    pub sensor_timeout_ms: u64,
    /// 业务时区
    pub timezone: Tz,
    /// 管理员令牌
    pub admin_token: Option<String>,
    /// 日志级别
    pub log_level: String,
    /// JSON 日志
    pub log_json: bool,
    /// 运行环境: development | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            sensor_url: std::env::var("SENSOR_URL")
                .unwrap_or_else(|_| "http://192.168.43.112".into()),
            sensor_timeout_ms: std::env::var("SENSOR_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(20000),
            timezone: parse_timezone(
                &std::env::var("TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.into()),
            ),
            admin_token: std::env::var("ADMIN_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库文件路径: {work_dir}/database/attendance.db
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
            .join("database")
            .join("attendance.db")
    }

    /// 日志目录: {work_dir}/logs
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn sensor_timeout(&self) -> Duration {
        Duration::from_millis(self.sensor_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// 解析时区名称，无效时回退到 UTC
pub fn parse_timezone(name: &str) -> Tz {
    name.trim().parse::<Tz>().unwrap_or_else(|_| {
        tracing::warn!(timezone = %name, "Unknown TIMEZONE, falling back to UTC");
        Tz::UTC
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Asia/Taipei"), chrono_tz::Asia::Taipei);
        assert_eq!(parse_timezone(" Europe/Madrid "), chrono_tz::Europe::Madrid);
        assert_eq!(parse_timezone("Mars/Olympus"), Tz::UTC);
    }

    #[test]
    fn test_paths_under_work_dir() {
        let config = Config::with_overrides("/tmp/attendance", 0);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/attendance/database/attendance.db")
        );
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/attendance/logs"));
    }
}
