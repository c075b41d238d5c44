//! Data models
//!
//! Shared between clock-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All row IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod attendance;
pub mod employee;
pub mod enrollment;
pub mod report;

// Re-exports
pub use attendance::*;
pub use employee::*;
pub use enrollment::*;
pub use report::*;
