// sensor-client/src/http.rs
// 指纹传感器 HTTP 驱动

use crate::error::{SensorError, SensorResult};
use crate::sensor::FingerprintSensor;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::EnrollmentId;
use std::time::Duration;
use tracing::{debug, instrument};

/// Firmware error body: `{ "error": "..." }`
#[derive(serde::Deserialize)]
struct FirmwareError {
    error: String,
}

#[derive(serde::Deserialize)]
struct RegisterResponse {
    id: EnrollmentId,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    fingerprint_id: EnrollmentId,
}

/// List entries are `{ "id": .. }` objects; bare ids are accepted too.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ListEntry {
    Object { id: EnrollmentId },
    Bare(EnrollmentId),
}

impl From<ListEntry> for EnrollmentId {
    fn from(entry: ListEntry) -> Self {
        match entry {
            ListEntry::Object { id } | ListEntry::Bare(id) => id,
        }
    }
}

/// Sensor reached over the firmware's HTTP API
#[derive(Debug, Clone)]
pub struct HttpSensor {
    client: Client,
    base_url: String,
}

impl HttpSensor {
    /// Create a sensor client with a 30s transport timeout
    pub fn new(base_url: &str) -> SensorResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a sensor client with a custom transport timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> SensorResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| SensorError::InvalidConfig(format!("Invalid sensor URL {base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SensorError::InvalidConfig(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn rejection(response: Response) -> SensorError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<FirmwareError>(&text)
            .map(|e| e.error)
            .unwrap_or(text);
        SensorError::Rejected { status, message }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> SensorResult<T> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| SensorError::InvalidResponse(format!("{e}: {text}")))
    }
}

#[async_trait]
impl FingerprintSensor for HttpSensor {
    #[instrument(skip(self), fields(sensor = %self.base_url))]
    async fn enroll(&self) -> SensorResult<EnrollmentId> {
        let response = self
            .client
            .post(self.url("/api/fingerprints/register"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        let body: RegisterResponse = Self::read_json(response).await?;
        debug!(enrollment_id = %body.id, "Sensor enrolled fingerprint");
        Ok(body.id)
    }

    #[instrument(skip(self), fields(sensor = %self.base_url))]
    async fn verify(&self) -> SensorResult<EnrollmentId> {
        let response = self
            .client
            .post(self.url("/api/fingerprints/verify"))
            .send()
            .await?;
        let status = response.status();
        // 404 and every other 4xx mean "no match" on this firmware
        if status.is_client_error() {
            return Err(SensorError::NoMatch);
        }
        if !status.is_success() {
            return Err(Self::rejection(response).await);
        }
        let body: VerifyResponse = Self::read_json(response).await?;
        Ok(body.fingerprint_id)
    }

    #[instrument(skip(self), fields(sensor = %self.base_url, enrollment_id = %id))]
    async fn delete(&self, id: &EnrollmentId) -> SensorResult<()> {
        let response = self
            .client
            .delete(self.url("/api/fingerprints/delete"))
            .query(&[("id", id.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(sensor = %self.base_url))]
    async fn list(&self) -> SensorResult<Vec<EnrollmentId>> {
        let response = self
            .client
            .get(self.url("/api/fingerprints"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        let entries: Vec<ListEntry> = Self::read_json(response).await?;
        Ok(entries.into_iter().map(EnrollmentId::from).collect())
    }
}
