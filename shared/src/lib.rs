//! Shared types for the attendance server
//!
//! Data models, the unified error system and small utilities used by
//! both the server and the sensor driver.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::EnrollmentId;
