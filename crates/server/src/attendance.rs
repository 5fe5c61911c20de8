//! Attendance, deduction and salary endpoints.

use api_types::attendance::{
    AttendanceMark, AttendanceResult, DeductionNew, DeductionView, EmployeeDashboardView,
    MonthlySummaryView,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::Datelike;
use serde::Deserialize;

use crate::{ServerError, server::ServerState};
use engine::{AttendanceOutcome, users};

fn map_status(status: api_types::AttendanceStatus) -> engine::AttendanceStatus {
    match status {
        api_types::AttendanceStatus::Present => engine::AttendanceStatus::Present,
        api_types::AttendanceStatus::Absent => engine::AttendanceStatus::Absent,
    }
}

pub async fn mark(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AttendanceMark>,
) -> Result<Json<AttendanceResult>, ServerError> {
    state.engine.manager_by_user(&user.id).await?;

    let today = crate::server::today();
    let date = payload.date.unwrap_or(today);
    let outcome = state
        .engine
        .record_attendance(&payload.employee_id, date, map_status(payload.status), today)
        .await?;

    Ok(Json(AttendanceResult {
        changed: matches!(outcome, AttendanceOutcome::Recorded { .. }),
        date,
        status: payload.status,
    }))
}

pub async fn create_deduction(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DeductionNew>,
) -> Result<Json<DeductionView>, ServerError> {
    let manager = state.engine.manager_by_user(&user.id).await?;

    let deduction = state
        .engine
        .create_deduction(
            &manager.id,
            &payload.employee_id,
            payload.amount,
            &payload.reason,
            crate::server::today(),
        )
        .await?;
    Ok(Json(DeductionView {
        deduction_id: deduction.id,
        amount: deduction.amount,
        reason: deduction.reason,
    }))
}

pub async fn employee_dashboard(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<EmployeeDashboardView>, ServerError> {
    let employee = state.engine.employee_by_user(&user.id).await?;
    let dashboard = state
        .engine
        .employee_dashboard(&employee.id, crate::server::today())
        .await?;

    Ok(Json(EmployeeDashboardView {
        employee_id: dashboard.employee_id,
        name: dashboard.name,
        base_salary: dashboard.base_salary,
        days_worked: dashboard.days_worked,
        total_days: dashboard.total_days,
        attendance_percentage: dashboard.attendance_percentage,
        salary_balance: dashboard.salary_balance,
        total_deductions: dashboard.total_deductions,
        final_salary: dashboard.final_salary,
    }))
}

#[derive(Deserialize)]
pub struct MonthQuery {
    year: Option<i32>,
    month: Option<u32>,
}

pub async fn monthly_summary(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlySummaryView>, ServerError> {
    let employee = state.engine.employee_by_user(&user.id).await?;

    let today = crate::server::today();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    let summary = state
        .engine
        .monthly_attendance_summary(&employee.id, year, month)
        .await?;

    Ok(Json(MonthlySummaryView {
        total_days: summary.total_days,
        present: summary.present,
        absent: summary.absent,
        unmarked: summary.unmarked,
    }))
}
