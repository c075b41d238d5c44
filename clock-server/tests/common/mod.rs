//! Shared setup for integration tests: a file-backed SQLite store in a
//! temp dir and a scripted sensor.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use clock_server::core::{Config, ServerState};
use clock_server::db::DbService;
use clock_server::utils::time;
use clock_server::{AdminAccess, ReconciliationCoordinator};
use sensor_client::ScriptedSensor;
use shared::models::{Employee, EmployeeCreate};
use tempfile::TempDir;

pub const ADMIN_TOKEN: &str = "test-admin-token";
pub const TZ: chrono_tz::Tz = chrono_tz::Asia::Taipei;

pub struct TestApp {
    pub state: ServerState,
    pub sensor: Arc<ScriptedSensor>,
    pub admin: AdminAccess,
    _dir: TempDir,
}

impl TestApp {
    pub fn coordinator(&self) -> &ReconciliationCoordinator {
        &self.state.coordinator
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.state.db.pool
    }

    /// Register an employee without an enrollment
    pub async fn hire(&self, name: &str, day_rate: f64) -> Employee {
        self.coordinator()
            .register_employee(&self.admin, employee(name, day_rate), None)
            .await
            .unwrap()
    }

    /// Register an employee holding `enrollment_id`, also stored on the sensor
    pub async fn hire_enrolled(&self, name: &str, day_rate: f64, enrollment_id: &str) -> Employee {
        self.sensor.store(enrollment_id).await;
        self.coordinator()
            .register_employee(&self.admin, employee(name, day_rate), Some(enrollment_id.into()))
            .await
            .unwrap()
    }
}

pub async fn setup() -> TestApp {
    setup_with_timeout(2_000).await
}

pub async fn setup_with_timeout(sensor_timeout_ms: u64) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        work_dir: dir.path().to_string_lossy().into_owned(),
        http_port: 0,
        sensor_url: "http://127.0.0.1:9".into(),
        sensor_timeout_ms,
        timezone: TZ,
        admin_token: Some(ADMIN_TOKEN.into()),
        log_level: "info".into(),
        log_json: false,
        environment: "test".into(),
    };

    let db = DbService::new(&config.database_path()).await.unwrap();
    let sensor = Arc::new(ScriptedSensor::new());
    let state = ServerState::with_sensor(config, db, sensor.clone());
    let admin = state.admin_gate.authorize(ADMIN_TOKEN).unwrap();

    TestApp {
        state,
        sensor,
        admin,
        _dir: dir,
    }
}

pub fn employee(name: &str, day_rate: f64) -> EmployeeCreate {
    EmployeeCreate {
        name: name.into(),
        department: Some("Assembly".into()),
        position: None,
        day_rate,
    }
}

/// Unix millis of `2024-05-{day} {hour}:{minute}` in the business zone
pub fn at(day: u32, hour: u32, minute: u32) -> i64 {
    let date = NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
    let time = chrono::NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
    time::date_time_to_millis(date, time, TZ)
}
