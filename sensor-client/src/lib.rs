//! # sensor-client
//!
//! Fingerprint sensor driver - device capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to talk to the sensor:
//! - The [`FingerprintSensor`] capability (enroll, verify, delete, list)
//! - HTTP transport to the sensor firmware ([`HttpSensor`])
//! - Mapping device answers to [`SensorError`]
//!
//! Business logic (WHO clocked in, which employee owns a template) stays in
//! the server. Serializing device access and bounding call duration is the
//! caller's job.
//!
//! ## Example
//!
//! ```ignore
//! use sensor_client::{FingerprintSensor, HttpSensor};
//!
//! let sensor = HttpSensor::new("http://192.168.43.112")?;
//! let id = sensor.verify().await?;
//! println!("matched template {id}");
//! ```

mod error;
mod http;
#[cfg(feature = "mock")]
mod mock;
mod sensor;

// Re-exports
pub use error::{SensorError, SensorResult};
pub use http::HttpSensor;
#[cfg(feature = "mock")]
pub use mock::ScriptedSensor;
pub use sensor::FingerprintSensor;
pub use shared::EnrollmentId;
