mod common;

use clock_server::VerifyOutcome;
use clock_server::db::repository::attendance;
use clock_server::utils::ErrorCode;
use common::{at, setup, setup_with_timeout};
use sensor_client::SensorError;
use shared::models::ClockType;
use std::time::Duration;

// ========================================================================
// Daily sequence
// ========================================================================

#[tokio::test]
async fn test_in_then_out_then_already_completed() {
    let app = setup().await;
    let alice = app.hire_enrolled("Alice", 100.0, "1").await;
    for _ in 0..3 {
        app.sensor.push_verify(Ok("1".into())).await;
    }

    let first = app.coordinator().verify_and_clock_at(at(5, 9, 0)).await.unwrap();
    match first {
        VerifyOutcome::Success {
            employee,
            clock_type,
            timestamp,
        } => {
            assert_eq!(employee.id, alice.id);
            assert_eq!(clock_type, ClockType::In);
            assert_eq!(timestamp, at(5, 9, 0));
        }
        other => panic!("expected success, got {other:?}"),
    }

    let second = app.coordinator().verify_and_clock_at(at(5, 18, 0)).await.unwrap();
    assert!(matches!(
        second,
        VerifyOutcome::Success {
            clock_type: ClockType::Out,
            ..
        }
    ));

    let third = app.coordinator().verify_and_clock_at(at(5, 19, 0)).await.unwrap();
    match third {
        VerifyOutcome::AlreadyCompletedToday { employee } => assert_eq!(employee.id, alice.id),
        other => panic!("expected already completed, got {other:?}"),
    }

    assert_eq!(
        attendance::count_for_employee(app.pool(), alice.id).await.unwrap(),
        2
    );
}

#[tokio::test]
async fn test_next_day_starts_with_in() {
    let app = setup().await;
    app.hire_enrolled("Alice", 100.0, "1").await;
    for _ in 0..3 {
        app.sensor.push_verify(Ok("1".into())).await;
    }

    app.coordinator().verify_and_clock_at(at(5, 9, 0)).await.unwrap();
    app.coordinator().verify_and_clock_at(at(5, 18, 0)).await.unwrap();
    let next_day = app.coordinator().verify_and_clock_at(at(6, 0, 5)).await.unwrap();

    assert!(matches!(
        next_day,
        VerifyOutcome::Success {
            clock_type: ClockType::In,
            ..
        }
    ));
}

// ========================================================================
// Device outcomes
// ========================================================================

#[tokio::test]
async fn test_no_match_is_verification_failed() {
    let app = setup().await;
    let outcome = app.coordinator().verify_and_clock_at(at(5, 9, 0)).await.unwrap();
    assert!(matches!(outcome, VerifyOutcome::VerificationFailed));
}

#[tokio::test]
async fn test_unknown_template_is_unregistered() {
    let app = setup().await;
    app.sensor.store("42").await;
    app.sensor.push_verify(Ok("42".into())).await;

    let outcome = app.coordinator().verify_and_clock_at(at(5, 9, 0)).await.unwrap();
    match outcome {
        VerifyOutcome::UnregisteredFingerprint { enrollment_id } => {
            assert_eq!(enrollment_id.as_str(), "42")
        }
        other => panic!("expected unregistered, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_sensor_is_device_timeout() {
    let app = setup_with_timeout(50).await;
    let alice = app.hire_enrolled("Alice", 100.0, "1").await;
    app.sensor.push_verify(Ok("1".into())).await;
    app.sensor.set_delay(Some(Duration::from_millis(300))).await;

    let outcome = app.coordinator().verify_and_clock_at(at(5, 9, 0)).await.unwrap();
    assert!(matches!(outcome, VerifyOutcome::DeviceTimeout));

    // The late match is dropped, nothing is clocked
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(
        attendance::count_for_employee(app.pool(), alice.id).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_sensor_failure_is_an_error() {
    let app = setup().await;
    app.sensor
        .push_verify(Err(SensorError::Transport("connection refused".into())))
        .await;

    let err = app
        .coordinator()
        .verify_and_clock_at(at(5, 9, 0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::SensorUnavailable);
}
