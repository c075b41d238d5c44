//! Sensor capability trait

use crate::error::SensorResult;
use async_trait::async_trait;
use shared::EnrollmentId;

/// Operations offered by a fingerprint sensor.
///
/// Every call is a blocking request/response on the physical device. The
/// device offers no concurrency guarantees, so callers must not issue two
/// operations at once.
#[async_trait]
pub trait FingerprintSensor: Send + Sync {
    /// Capture a new finger and store it, returning the new template id
    async fn enroll(&self) -> SensorResult<EnrollmentId>;

    /// Match a live finger against stored templates
    ///
    /// Returns [`SensorError::NoMatch`](crate::SensorError::NoMatch) when
    /// no template matches.
    async fn verify(&self) -> SensorResult<EnrollmentId>;

    /// Remove a stored template
    async fn delete(&self, id: &EnrollmentId) -> SensorResult<()>;

    /// List all stored template ids
    async fn list(&self) -> SensorResult<Vec<EnrollmentId>>;
}
