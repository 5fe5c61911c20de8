use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::Database;

use engine::{AttendanceOutcome, AttendanceStatus, Engine, EngineError};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

async fn seed_employee(engine: &Engine, base_salary: rust_decimal::Decimal) -> (String, String) {
    let manager = engine
        .create_manager("mario", "password", "Mario")
        .await
        .unwrap();
    let employee = engine
        .create_employee(&manager.id, "anna", "password", "Anna", base_salary)
        .await
        .unwrap();
    (manager.id, employee.id)
}

#[tokio::test]
async fn salary_tracks_attendance_and_deductions() {
    let engine = engine_with_db().await;
    let (manager_id, employee_id) = seed_employee(&engine, dec!(500)).await;
    let today = d(2026, 3, 31);

    for day in 1..=10 {
        let outcome = engine
            .record_attendance(&employee_id, d(2026, 3, day), AttendanceStatus::Present, today)
            .await
            .unwrap();
        assert!(matches!(outcome, AttendanceOutcome::Recorded { .. }));
    }

    engine
        .create_deduction(&manager_id, &employee_id, dec!(200), "broken churn", today)
        .await
        .unwrap();

    let salary = engine
        .salary_for_month(&employee_id, "2026-03")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(salary.days_worked, 10);
    assert_eq!(salary.total_deductions, dec!(200));
    assert_eq!(salary.final_salary, dec!(4800));
}

#[tokio::test]
async fn resubmitting_same_status_is_a_noop() {
    let engine = engine_with_db().await;
    let (_, employee_id) = seed_employee(&engine, dec!(500)).await;
    let today = d(2026, 3, 31);

    engine
        .record_attendance(&employee_id, d(2026, 3, 5), AttendanceStatus::Present, today)
        .await
        .unwrap();
    let before = engine
        .salary_for_month(&employee_id, "2026-03")
        .await
        .unwrap()
        .unwrap();

    let outcome = engine
        .record_attendance(&employee_id, d(2026, 3, 5), AttendanceStatus::Present, today)
        .await
        .unwrap();
    assert!(matches!(outcome, AttendanceOutcome::Unchanged { .. }));

    let after = engine
        .salary_for_month(&employee_id, "2026-03")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn overwriting_status_recomputes_days_worked() {
    let engine = engine_with_db().await;
    let (_, employee_id) = seed_employee(&engine, dec!(500)).await;
    let today = d(2026, 3, 31);

    engine
        .record_attendance(&employee_id, d(2026, 3, 5), AttendanceStatus::Present, today)
        .await
        .unwrap();
    let salary = engine
        .salary_for_month(&employee_id, "2026-03")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(salary.days_worked, 1);
    assert_eq!(salary.final_salary, dec!(500));

    engine
        .record_attendance(&employee_id, d(2026, 3, 5), AttendanceStatus::Absent, today)
        .await
        .unwrap();
    let salary = engine
        .salary_for_month(&employee_id, "2026-03")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(salary.days_worked, 0);
    assert_eq!(salary.final_salary, dec!(0));

    let summary = engine
        .monthly_attendance_summary(&employee_id, 2026, 3)
        .await
        .unwrap();
    assert_eq!(summary.present, 0);
    assert_eq!(summary.absent, 1);
    assert_eq!(summary.total_days, 31);
    assert_eq!(summary.unmarked, 30);
}

#[tokio::test]
async fn future_attendance_date_is_rejected() {
    let engine = engine_with_db().await;
    let (_, employee_id) = seed_employee(&engine, dec!(500)).await;
    let today = d(2026, 3, 15);

    let err = engine
        .record_attendance(&employee_id, d(2026, 3, 16), AttendanceStatus::Present, today)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    assert!(engine
        .salary_for_month(&employee_id, "2026-03")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn deduction_requires_matching_manager() {
    let engine = engine_with_db().await;
    let (_, employee_id) = seed_employee(&engine, dec!(500)).await;
    let other = engine
        .create_manager("luigi", "password", "Luigi")
        .await
        .unwrap();

    let err = engine
        .create_deduction(&other.id, &employee_id, dec!(50), "late", d(2026, 3, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn deduction_lands_on_current_month() {
    let engine = engine_with_db().await;
    let (manager_id, employee_id) = seed_employee(&engine, dec!(500)).await;

    // Attendance history lives in March; the deduction is created in April
    // and lands on April's salary row.
    let march = d(2026, 3, 31);
    engine
        .record_attendance(&employee_id, d(2026, 3, 2), AttendanceStatus::Present, march)
        .await
        .unwrap();
    engine
        .create_deduction(&manager_id, &employee_id, dec!(75), "advance", d(2026, 4, 1))
        .await
        .unwrap();

    let march_salary = engine
        .salary_for_month(&employee_id, "2026-03")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(march_salary.total_deductions, dec!(0));

    let april_salary = engine
        .salary_for_month(&employee_id, "2026-04")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(april_salary.total_deductions, dec!(75));
    assert_eq!(april_salary.days_worked, 0);
    assert_eq!(april_salary.final_salary, dec!(-75));
}

#[tokio::test]
async fn employee_dashboard_matches_live_attendance() {
    let engine = engine_with_db().await;
    let (manager_id, employee_id) = seed_employee(&engine, dec!(400)).await;
    let today = d(2026, 4, 30);

    for day in 1..=6 {
        engine
            .record_attendance(&employee_id, d(2026, 4, day), AttendanceStatus::Present, today)
            .await
            .unwrap();
    }
    engine
        .create_deduction(&manager_id, &employee_id, dec!(100), "uniform", today)
        .await
        .unwrap();

    let dashboard = engine.employee_dashboard(&employee_id, today).await.unwrap();
    assert_eq!(dashboard.days_worked, 6);
    assert_eq!(dashboard.total_days, 30);
    assert_eq!(dashboard.attendance_percentage, dec!(20));
    assert_eq!(dashboard.salary_balance, dec!(2400));
    assert_eq!(dashboard.total_deductions, dec!(100));
    assert_eq!(dashboard.final_salary, dec!(2300));
}
