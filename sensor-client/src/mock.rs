//! Scriptable in-process sensor
//!
//! Behaves like a small sensor with its own template store. Results can be
//! queued per operation to drive specific outcomes in tests.

use crate::error::{SensorError, SensorResult};
use crate::sensor::FingerprintSensor;
use async_trait::async_trait;
use shared::EnrollmentId;
use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Default)]
struct Script {
    enroll: VecDeque<SensorResult<EnrollmentId>>,
    verify: VecDeque<SensorResult<EnrollmentId>>,
    delete_failure: Option<SensorError>,
    delay: Option<Duration>,
    stored: BTreeSet<EnrollmentId>,
    deleted: Vec<EnrollmentId>,
    next_id: u32,
}

/// In-process sensor with scripted answers
#[derive(Default)]
pub struct ScriptedSensor {
    script: Mutex<Script>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

impl ScriptedSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a template as already stored on the device
    pub async fn store(&self, id: impl Into<EnrollmentId>) {
        self.script.lock().await.stored.insert(id.into());
    }

    /// Queue the answer of the next `enroll()`
    ///
    /// With an empty queue `enroll()` allocates the next free numeric id.
    pub async fn push_enroll(&self, result: SensorResult<EnrollmentId>) {
        self.script.lock().await.enroll.push_back(result);
    }

    /// Queue the answer of the next `verify()`
    ///
    /// With an empty queue `verify()` reports no match.
    pub async fn push_verify(&self, result: SensorResult<EnrollmentId>) {
        self.script.lock().await.verify.push_back(result);
    }

    /// Make every `delete()` fail with `err` (or succeed again with `None`)
    pub async fn set_delete_failure(&self, err: Option<SensorError>) {
        self.script.lock().await.delete_failure = err;
    }

    /// Delay every operation, used to provoke caller timeouts
    pub async fn set_delay(&self, delay: Option<Duration>) {
        self.script.lock().await.delay = delay;
    }

    /// Templates currently stored
    pub async fn stored(&self) -> BTreeSet<EnrollmentId> {
        self.script.lock().await.stored.clone()
    }

    /// Ids passed to successful `delete()` calls, in order
    pub async fn deleted(&self) -> Vec<EnrollmentId> {
        self.script.lock().await.deleted.clone()
    }

    /// Total number of operations started
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of operations observed running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn begin(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.script.lock().await.delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn end(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl FingerprintSensor for ScriptedSensor {
    async fn enroll(&self) -> SensorResult<EnrollmentId> {
        self.begin().await;
        let mut script = self.script.lock().await;
        let result = match script.enroll.pop_front() {
            Some(result) => result,
            None => loop {
                script.next_id += 1;
                let candidate = EnrollmentId::from(script.next_id);
                if !script.stored.contains(&candidate) {
                    break Ok(candidate);
                }
            },
        };
        if let Ok(id) = &result {
            script.stored.insert(id.clone());
        }
        drop(script);
        self.end();
        result
    }

    async fn verify(&self) -> SensorResult<EnrollmentId> {
        self.begin().await;
        let result = self
            .script
            .lock()
            .await
            .verify
            .pop_front()
            .unwrap_or(Err(SensorError::NoMatch));
        self.end();
        result
    }

    async fn delete(&self, id: &EnrollmentId) -> SensorResult<()> {
        self.begin().await;
        let mut script = self.script.lock().await;
        let result = match script.delete_failure.clone() {
            Some(err) => Err(err),
            None => {
                script.stored.remove(id);
                script.deleted.push(id.clone());
                Ok(())
            }
        };
        drop(script);
        self.end();
        result
    }

    async fn list(&self) -> SensorResult<Vec<EnrollmentId>> {
        self.begin().await;
        let ids = self.script.lock().await.stored.iter().cloned().collect();
        self.end();
        Ok(ids)
    }
}
