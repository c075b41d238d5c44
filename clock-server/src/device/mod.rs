//! Sensor Gate
//!
//! Single entry point to the fingerprint sensor. The device handles one
//! request at a time, so every operation takes the same async lock.
//!
//! Each operation runs in its own spawned task and the caller waits at most
//! `timeout` for the answer. A caller that stops waiting (timeout or dropped
//! request) does not cancel the task: it finishes on the device, keeps the
//! lock until then, and its late result is only logged. Tasks whose caller
//! is already gone by the time they get the lock never reach the device.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sensor_client::{FingerprintSensor, SensorError};
use shared::models::EnrollmentId;
use thiserror::Error;
use tokio::sync::{Mutex, oneshot};

#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    #[error("No matching fingerprint")]
    NoMatch,

    #[error("Sensor timeout: {0}")]
    Timeout(String),

    #[error("Sensor unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid sensor response: {0}")]
    InvalidResponse(String),

    #[error("Sensor task aborted")]
    Aborted,
}

impl From<SensorError> for DeviceError {
    fn from(err: SensorError) -> Self {
        match err {
            SensorError::NoMatch => DeviceError::NoMatch,
            SensorError::Timeout(msg) => DeviceError::Timeout(msg),
            SensorError::InvalidResponse(msg) => DeviceError::InvalidResponse(msg),
            other @ (SensorError::Rejected { .. }
            | SensorError::Transport(_)
            | SensorError::InvalidConfig(_)) => DeviceError::Unavailable(other.to_string()),
        }
    }
}

pub type DeviceResult<T> = Result<T, DeviceError>;

#[derive(Clone)]
pub struct SensorGate {
    sensor: Arc<dyn FingerprintSensor>,
    lock: Arc<Mutex<()>>,
    timeout: Duration,
}

impl SensorGate {
    pub fn new(sensor: Arc<dyn FingerprintSensor>, timeout: Duration) -> Self {
        Self {
            sensor,
            lock: Arc::new(Mutex::new(())),
            timeout,
        }
    }

    pub async fn enroll(&self) -> DeviceResult<EnrollmentId> {
        self.run(
            "enroll",
            |sensor| async move { sensor.enroll().await },
            |late: Result<EnrollmentId, SensorError>| match late {
                Ok(id) => tracing::warn!(
                    enrollment_id = %id,
                    "Orphaned enrollment: sensor stored a template after the caller gave up"
                ),
                Err(e) => tracing::info!(error = %e, "Late enroll failure dropped"),
            },
        )
        .await
    }

    pub async fn verify(&self) -> DeviceResult<EnrollmentId> {
        self.run(
            "verify",
            |sensor| async move { sensor.verify().await },
            |late: Result<EnrollmentId, SensorError>| match late {
                Ok(id) => tracing::info!(enrollment_id = %id, "Late verify result dropped"),
                Err(e) => tracing::debug!(error = %e, "Late verify failure dropped"),
            },
        )
        .await
    }

    pub async fn delete(&self, id: &EnrollmentId) -> DeviceResult<()> {
        let id = id.clone();
        let late_id = id.clone();
        self.run(
            "delete",
            move |sensor| async move { sensor.delete(&id).await },
            move |late: Result<(), SensorError>| match late {
                Ok(()) => tracing::info!(enrollment_id = %late_id, "Late template delete completed"),
                Err(e) => tracing::warn!(
                    enrollment_id = %late_id,
                    error = %e,
                    "Late template delete failed"
                ),
            },
        )
        .await
    }

    pub async fn list(&self) -> DeviceResult<Vec<EnrollmentId>> {
        self.run(
            "list",
            |sensor| async move { sensor.list().await },
            |_: Result<Vec<EnrollmentId>, SensorError>| {
                tracing::debug!("Late template list dropped")
            },
        )
        .await
    }

    async fn run<T, F, Fut, L>(&self, op: &'static str, call: F, on_late: L) -> DeviceResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<dyn FingerprintSensor>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, SensorError>> + Send + 'static,
        L: FnOnce(Result<T, SensorError>) + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let sensor = self.sensor.clone();
        let lock = self.lock.clone();

        tokio::spawn(async move {
            let _guard = lock.lock_owned().await;
            if tx.is_closed() {
                tracing::debug!(op, "Caller gone before sensor was free, skipping");
                return;
            }
            let result = call(sensor).await;
            if let Err(late) = tx.send(result) {
                on_late(late);
            }
        });

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(result)) => result.map_err(|e| {
                if !matches!(e, SensorError::NoMatch) {
                    tracing::warn!(op, error = %e, "Sensor operation failed");
                }
                DeviceError::from(e)
            }),
            Ok(Err(_)) => {
                tracing::error!(op, "Sensor task ended without an answer");
                Err(DeviceError::Aborted)
            }
            Err(_) => {
                tracing::warn!(op, timeout_ms = self.timeout.as_millis() as u64, "Sensor timeout");
                Err(DeviceError::Timeout(format!(
                    "{} did not answer within {} ms",
                    op,
                    self.timeout.as_millis()
                )))
            }
        }
    }
}
