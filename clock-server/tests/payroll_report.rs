mod common;

use clock_server::utils::ErrorCode;
use common::{at, setup};
use rust_decimal::Decimal;
use shared::models::{ClockType, DayKind, ManualRecordCreate};

#[tokio::test]
async fn test_month_with_one_complete_and_one_incomplete_day() {
    let app = setup().await;
    let alice = app.hire("Alice", 100.0).await;
    let ledger = app.coordinator().ledger();
    ledger.insert(alice.id, ClockType::In, at(5, 9, 0), false).await.unwrap();
    ledger.insert(alice.id, ClockType::Out, at(5, 18, 0), false).await.unwrap();
    ledger.insert(alice.id, ClockType::In, at(10, 9, 0), false).await.unwrap();

    let report = app.coordinator().monthly_report("2024-05").await.unwrap();
    let stat = &report.employees[0];
    assert_eq!(stat.full_days, 1);
    assert_eq!(stat.half_days, 0);
    assert_eq!(stat.days_worked, Decimal::ONE);
    assert_eq!(stat.total_pay, Decimal::new(10000, 2));
}

#[tokio::test]
async fn test_report_totals_across_employees() {
    let app = setup().await;
    let alice = app.hire("Alice", 100.0).await;
    let bob = app.hire("Bob", 80.5).await;
    app.hire("Carol", 120.0).await;
    let ledger = app.coordinator().ledger();

    // Alice: one full day, one half day
    ledger.insert(alice.id, ClockType::In, at(1, 9, 0), false).await.unwrap();
    ledger.insert(alice.id, ClockType::Out, at(1, 18, 0), false).await.unwrap();
    ledger.insert(alice.id, ClockType::In, at(2, 9, 0), true).await.unwrap();
    ledger.insert(alice.id, ClockType::Out, at(2, 13, 0), false).await.unwrap();
    // Bob: two full days
    for day in [3, 4] {
        ledger.insert(bob.id, ClockType::In, at(day, 8, 0), false).await.unwrap();
        ledger.insert(bob.id, ClockType::Out, at(day, 17, 0), false).await.unwrap();
    }
    // Outside the month
    ledger.insert(bob.id, ClockType::In, at(31, 23, 59) + 60_000, false).await.unwrap();

    let report = app.coordinator().monthly_report("2024-05").await.unwrap();
    assert_eq!(report.month, "2024-05");
    assert_eq!(report.total_employees, 3);
    assert_eq!(report.total_work_days, Decimal::new(35, 1));
    // 1.5 * 100.00 + 2 * 80.50
    assert_eq!(report.total_salary, Decimal::new(31100, 2));

    let alice_stat = report
        .employees
        .iter()
        .find(|s| s.employee_id == alice.id)
        .unwrap();
    assert_eq!(alice_stat.total_pay, Decimal::new(15000, 2));
}

#[tokio::test]
async fn test_employee_month_lists_days_newest_first() {
    let app = setup().await;
    let alice = app.hire("Alice", 100.0).await;
    let ledger = app.coordinator().ledger();
    ledger.insert(alice.id, ClockType::In, at(5, 9, 0), false).await.unwrap();
    ledger.insert(alice.id, ClockType::Out, at(5, 18, 0), true).await.unwrap();
    ledger.insert(alice.id, ClockType::In, at(10, 9, 0), false).await.unwrap();

    let view = app
        .coordinator()
        .employee_month(alice.id, "2024-05")
        .await
        .unwrap();

    assert_eq!(view.days.len(), 2);
    assert_eq!(view.days[0].kind, DayKind::Incomplete);
    assert_eq!(view.days[1].kind, DayKind::Half);
    assert_eq!(view.stat.days_worked, Decimal::new(5, 1));
}

#[tokio::test]
async fn test_invalid_month_is_rejected() {
    let app = setup().await;
    let err = app.coordinator().monthly_report("2024-5").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}

// ========================================================================
// Manual adjustments
// ========================================================================

#[tokio::test]
async fn test_manual_append_edit_and_delete() {
    let app = setup().await;
    let alice = app.hire("Alice", 100.0).await;

    let record = app
        .coordinator()
        .manual_append(
            &app.admin,
            ManualRecordCreate {
                employee_id: alice.id,
                date: "2024-05-05".into(),
                time: "09:00".into(),
                clock_type: ClockType::Out,
                is_half_day: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(record.timestamp, at(5, 9, 0));

    let edited = app
        .coordinator()
        .edit_record(
            &app.admin,
            record.id,
            shared::models::RecordEdit {
                clock_type: ClockType::In,
                is_half_day: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.clock_type, ClockType::In);
    assert!(edited.is_half_day);

    app.coordinator().delete_record(&app.admin, record.id).await.unwrap();
    let err = app
        .coordinator()
        .delete_record(&app.admin, record.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AttendanceRecordNotFound);
}

#[tokio::test]
async fn test_manual_append_checks_input_and_employee() {
    let app = setup().await;
    let alice = app.hire("Alice", 100.0).await;

    let bad_time = ManualRecordCreate {
        employee_id: alice.id,
        date: "2024-05-05".into(),
        time: "25:00".into(),
        clock_type: ClockType::In,
        is_half_day: false,
    };
    let err = app.coordinator().manual_append(&app.admin, bad_time).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    let unknown = ManualRecordCreate {
        employee_id: alice.id + 1,
        date: "2024-05-05".into(),
        time: "09:00".into(),
        clock_type: ClockType::In,
        is_half_day: false,
    };
    let err = app.coordinator().manual_append(&app.admin, unknown).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::EmployeeNotFound);
}
