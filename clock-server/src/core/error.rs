use thiserror::Error;

use crate::utils::AppError;

/// 服务器启动/运行错误
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("数据库初始化失败: {0}")]
    Database(String),

    #[error("传感器初始化失败: {0}")]
    Sensor(#[from] sensor_client::SensorError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AppError> for ServerError {
    fn from(err: AppError) -> Self {
        ServerError::Database(err.message)
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
