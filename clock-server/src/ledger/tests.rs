use super::*;
use crate::db::DbService;
use crate::db::repository::employee;
use chrono::NaiveTime;
use shared::models::EmployeeCreate;
use std::sync::Arc;

const TZ: Tz = chrono_tz::Asia::Taipei;

async fn setup() -> (DbService, AttendanceLedger, i64) {
    let db = DbService::open_in_memory().await.unwrap();
    let ledger = AttendanceLedger::new(db.pool.clone(), TZ);
    let id = hire(&db.pool, "Alice").await;
    (db, ledger, id)
}

async fn hire(pool: &SqlitePool, name: &str) -> i64 {
    employee::create(
        pool,
        EmployeeCreate {
            name: name.into(),
            department: None,
            position: None,
            day_rate: 100.0,
        },
        None,
    )
    .await
    .unwrap()
    .id
}

fn at(day: u32, hour: u32, min: u32) -> i64 {
    let date = NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
    time::date_time_to_millis(date, NaiveTime::from_hms_opt(hour, min, 0).unwrap(), TZ)
}

fn record(clock_type: ClockType, timestamp: i64) -> AttendanceRecord {
    AttendanceRecord {
        id: 0,
        employee_id: 1,
        timestamp,
        clock_type,
        is_half_day: false,
        source: RecordSource::Device,
    }
}

// ========================================================================
// Day state
// ========================================================================

#[test]
fn test_day_state_derivation() {
    assert_eq!(DayState::derive(&[]), DayState::Empty);
    assert_eq!(
        DayState::derive(&[record(ClockType::In, 1)]),
        DayState::AwaitingOut
    );
    assert_eq!(
        DayState::derive(&[record(ClockType::In, 1), record(ClockType::Out, 2)]),
        DayState::Complete
    );
    // Any other shape counts as complete
    assert_eq!(
        DayState::derive(&[record(ClockType::Out, 1)]),
        DayState::Complete
    );
    assert_eq!(
        DayState::derive(&[record(ClockType::In, 1), record(ClockType::In, 2)]),
        DayState::Complete
    );
}

#[test]
fn test_next_clock_type() {
    assert_eq!(DayState::Empty.next_clock_type(), Some(ClockType::In));
    assert_eq!(DayState::AwaitingOut.next_clock_type(), Some(ClockType::Out));
    assert_eq!(DayState::Complete.next_clock_type(), None);
}

// ========================================================================
// Guarded append
// ========================================================================

#[tokio::test]
async fn test_append_follows_in_out_sequence() {
    let (_db, ledger, emp) = setup().await;

    let r1 = ledger.append(emp, ClockType::In, at(5, 9, 0), false).await.unwrap();
    let r2 = ledger.append(emp, ClockType::Out, at(5, 18, 0), false).await.unwrap();
    assert_eq!(r1.clock_type, ClockType::In);
    assert_eq!(r2.clock_type, ClockType::Out);

    let err = ledger
        .append(emp, ClockType::In, at(5, 19, 0), false)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::DayAlreadyComplete { employee_id, .. } if employee_id == emp));
}

#[tokio::test]
async fn test_append_out_on_empty_day_rejected() {
    let (_db, ledger, emp) = setup().await;

    let err = ledger
        .append(emp, ClockType::Out, at(5, 18, 0), false)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InvalidTransition {
            requested: ClockType::Out,
            expected: ClockType::In
        }
    ));
}

#[tokio::test]
async fn test_clock_resolves_type_per_day() {
    let (_db, ledger, emp) = setup().await;

    assert_eq!(ledger.clock(emp, at(5, 9, 0)).await.unwrap().clock_type, ClockType::In);
    assert_eq!(ledger.clock(emp, at(5, 18, 0)).await.unwrap().clock_type, ClockType::Out);
    assert!(matches!(
        ledger.clock(emp, at(5, 18, 5)).await,
        Err(LedgerError::DayAlreadyComplete { .. })
    ));

    // Next day starts over
    assert_eq!(ledger.clock(emp, at(6, 9, 0)).await.unwrap().clock_type, ClockType::In);
    assert_eq!(ledger.day_state(emp, at(6, 12, 0)).await.unwrap(), DayState::AwaitingOut);
}

#[tokio::test]
async fn test_day_boundary_uses_business_zone() {
    let (_db, ledger, emp) = setup().await;

    // 23:50 local and 00:10 local the next day are different days
    ledger.clock(emp, at(5, 23, 50)).await.unwrap();
    let next = ledger.clock(emp, at(6, 0, 10)).await.unwrap();
    assert_eq!(next.clock_type, ClockType::In);
}

#[tokio::test]
async fn test_day_locks_released_after_write() {
    let (_db, ledger, emp) = setup().await;
    ledger.clock(emp, at(5, 9, 0)).await.unwrap();
    let _ = ledger.clock(emp, at(5, 9, 1)).await;
    assert!(ledger.day_locks.is_empty());
}

// ========================================================================
// Concurrency
// ========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_in_appends_store_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let db = DbService::new(&dir.path().join("ledger.db")).await.unwrap();
    let emp = hire(&db.pool, "Alice").await;
    let ledger = Arc::new(AttendanceLedger::new(db.pool.clone(), TZ));

    let tasks = (0..2).map(|i| {
        let ledger = ledger.clone();
        tokio::spawn(async move {
            ledger
                .append(emp, ClockType::In, at(5, 9, 0) + i, false)
                .await
        })
    });
    let results: Vec<_> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);

    let (start, end) = time::day_bounds(NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(), TZ);
    let stored = ledger
        .query_by_employee_and_range(emp, start, end, SortOrder::Asc)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].clock_type, ClockType::In);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_clocks_never_exceed_one_pair() {
    let dir = tempfile::tempdir().unwrap();
    let db = DbService::new(&dir.path().join("ledger.db")).await.unwrap();
    let emp = hire(&db.pool, "Alice").await;
    let ledger = Arc::new(AttendanceLedger::new(db.pool.clone(), TZ));

    let tasks = (0..6).map(|i| {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.clock(emp, at(5, 9, 0) + i).await })
    });
    let results: Vec<_> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
    assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|e| matches!(
        e,
        LedgerError::DayAlreadyComplete { .. }
    )));
}

// ========================================================================
// Operator path
// ========================================================================

#[tokio::test]
async fn test_insert_bypasses_sequence() {
    let (_db, ledger, emp) = setup().await;

    ledger.insert(emp, ClockType::In, at(5, 9, 0), false).await.unwrap();
    let second = ledger.insert(emp, ClockType::In, at(5, 10, 0), true).await.unwrap();
    assert_eq!(second.source, RecordSource::Manual);
    assert!(second.is_half_day);

    assert_eq!(ledger.day_state(emp, at(5, 12, 0)).await.unwrap(), DayState::Complete);
}

#[tokio::test]
async fn test_insert_for_unknown_employee_fails() {
    let (_db, ledger, _emp) = setup().await;
    let err = ledger.insert(999, ClockType::In, at(5, 9, 0), false).await.unwrap_err();
    assert!(matches!(err, LedgerError::Repo(RepoError::NotFound(_))));
}

#[tokio::test]
async fn test_edit_and_delete() {
    let (_db, ledger, emp) = setup().await;
    let rec = ledger.append(emp, ClockType::In, at(5, 9, 0), false).await.unwrap();

    let edited = ledger.edit(rec.id, ClockType::Out, true).await.unwrap();
    assert_eq!(edited.clock_type, ClockType::Out);
    assert!(edited.is_half_day);
    assert_eq!(edited.timestamp, rec.timestamp);

    ledger.delete(rec.id).await.unwrap();
    assert!(matches!(ledger.delete(rec.id).await, Err(LedgerError::RecordNotFound(_))));
    assert!(matches!(
        ledger.edit(rec.id, ClockType::In, false).await,
        Err(LedgerError::RecordNotFound(_))
    ));
}

// ========================================================================
// Queries
// ========================================================================

#[tokio::test]
async fn test_query_range_is_inclusive_and_ordered() {
    let (_db, ledger, emp) = setup().await;
    let t1 = at(5, 9, 0);
    let t2 = at(5, 18, 0);
    ledger.insert(emp, ClockType::In, t1, false).await.unwrap();
    ledger.insert(emp, ClockType::Out, t2, false).await.unwrap();

    let asc = ledger
        .query_by_employee_and_range(emp, t1, t2, SortOrder::Asc)
        .await
        .unwrap();
    assert_eq!(asc.iter().map(|r| r.timestamp).collect::<Vec<_>>(), vec![t1, t2]);

    let desc = ledger
        .query_by_employee_and_range(emp, t1, t2, SortOrder::Desc)
        .await
        .unwrap();
    assert_eq!(desc.iter().map(|r| r.timestamp).collect::<Vec<_>>(), vec![t2, t1]);

    let narrow = ledger
        .query_by_employee_and_range(emp, t1 + 1, t2 - 1, SortOrder::Asc)
        .await
        .unwrap();
    assert!(narrow.is_empty());
}

#[test]
fn test_group_by_day() {
    let records = vec![
        record(ClockType::In, at(5, 9, 0)),
        record(ClockType::Out, at(5, 18, 0)),
        record(ClockType::In, at(10, 9, 0)),
    ];
    let days = group_by_day(records, TZ);

    assert_eq!(days.len(), 2);
    let day5 = &days[&NaiveDate::from_ymd_opt(2024, 5, 5).unwrap()];
    assert_eq!(day5.len(), 2);
    assert_eq!(day5[0].clock_type, ClockType::In);
    assert_eq!(days[&NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()].len(), 1);
}
