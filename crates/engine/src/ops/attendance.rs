//! Attendance writes and the salary reconciliation they trigger.
//!
//! The salary row is derived state. Every attendance or deduction write
//! re-aggregates `days_worked` and `total_deductions` from the source rows
//! of that month and rewrites the row, inside the same transaction as the
//! triggering write. An O(days-in-month) scan per write buys the guarantee
//! that the row can never drift from its history.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    Attendance, AttendanceStatus, EngineError, ResultEngine, attendance, deductions, employees,
    salaries,
    util::{days_in_month, ensure_positive, month_bounds, month_key},
};

use super::{Engine, normalize_required, with_tx};

/// Result of an attendance write.
///
/// `Unchanged` is the one case the reconciler deliberately swallows: the
/// same status was already on file, so nothing was written and no salary
/// recompute ran.
#[derive(Clone, Debug, PartialEq)]
pub enum AttendanceOutcome {
    Unchanged {
        attendance: Attendance,
    },
    Recorded {
        attendance: Attendance,
        salary: salaries::Model,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthlyAttendanceSummary {
    pub total_days: i64,
    pub present: i64,
    pub absent: i64,
    pub unmarked: i64,
}

/// Current-month salary snapshot for the employee dashboard.
#[derive(Clone, Debug, PartialEq)]
pub struct EmployeeDashboard {
    pub employee_id: String,
    pub name: String,
    pub base_salary: Decimal,
    pub days_worked: i64,
    pub total_days: i64,
    pub attendance_percentage: Decimal,
    pub salary_balance: Decimal,
    pub total_deductions: Decimal,
    pub final_salary: Decimal,
}

impl Engine {
    /// Record (or overwrite) an employee's attendance for a day, then bring
    /// that month's salary row back in line with the attendance history.
    pub async fn record_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
        today: NaiveDate,
    ) -> ResultEngine<AttendanceOutcome> {
        if date > today {
            return Err(EngineError::Validation(
                "cannot mark attendance for a future date".to_string(),
            ));
        }

        with_tx!(self, |tx| {
            let employee = require_employee(&tx, employee_id).await?;

            let existing = attendance::Entity::find()
                .filter(attendance::Column::EmployeeId.eq(employee.id.clone()))
                .filter(attendance::Column::Date.eq(date))
                .one(&tx)
                .await?;

            let row = match existing {
                Some(row) if row.status == status.as_str() => {
                    return Ok(AttendanceOutcome::Unchanged {
                        attendance: Attendance::try_from(row)?,
                    });
                }
                Some(row) => {
                    let mut active: attendance::ActiveModel = row.into();
                    active.status = Set(status.as_str().to_string());
                    active.update(&tx).await?
                }
                None => {
                    attendance::ActiveModel {
                        id: Set(Uuid::new_v4().to_string()),
                        employee_id: Set(employee.id.clone()),
                        date: Set(date),
                        status: Set(status.as_str().to_string()),
                        created_at: Set(Utc::now()),
                    }
                    .insert(&tx)
                    .await?
                }
            };

            let salary = recompute_salary_on(&tx, &employee, date).await?;
            Ok(AttendanceOutcome::Recorded {
                attendance: Attendance::try_from(row)?,
                salary,
            })
        })
    }

    /// Append a deduction for one of the manager's employees and recompute
    /// the current month's salary.
    ///
    /// The deduction always lands on the current month's row, whatever month
    /// it conceptually belongs to.
    pub async fn create_deduction(
        &self,
        manager_id: &str,
        employee_id: &str,
        amount: Decimal,
        reason: &str,
        today: NaiveDate,
    ) -> ResultEngine<deductions::Model> {
        ensure_positive(amount, "amount")?;
        let reason = normalize_required(reason, "reason")?;

        with_tx!(self, |tx| {
            let employee = require_employee(&tx, employee_id).await?;
            if employee.manager_id != manager_id {
                return Err(EngineError::NotFound("employee not exists".to_string()));
            }

            let salary = get_or_create_salary_on(&tx, &employee, &month_key(today)).await?;
            let deduction = deductions::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                salary_id: Set(salary.id),
                amount: Set(amount),
                reason: Set(reason.clone()),
                created_at: Set(Utc::now()),
            }
            .insert(&tx)
            .await?;

            recompute_salary_on(&tx, &employee, today).await?;
            Ok(deduction)
        })
    }

    /// The salary row for an employee and `YYYY-MM` month, if one exists.
    pub async fn salary_for_month(
        &self,
        employee_id: &str,
        month: &str,
    ) -> ResultEngine<Option<salaries::Model>> {
        require_employee(&self.database, employee_id).await?;
        Ok(salaries::Entity::find()
            .filter(salaries::Column::EmployeeId.eq(employee_id))
            .filter(salaries::Column::Month.eq(month))
            .one(&self.database)
            .await?)
    }

    pub async fn monthly_attendance_summary(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> ResultEngine<MonthlyAttendanceSummary> {
        let anchor = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| EngineError::Validation(format!("invalid month: {year}-{month:02}")))?;
        let employee = require_employee(&self.database, employee_id).await?;
        let (start, end) = month_bounds(anchor)?;

        let present = attendance::Entity::find()
            .filter(attendance::Column::EmployeeId.eq(employee.id.clone()))
            .filter(attendance::Column::Date.gte(start))
            .filter(attendance::Column::Date.lt(end))
            .filter(attendance::Column::Status.eq(AttendanceStatus::Present.as_str()))
            .count(&self.database)
            .await? as i64;
        let absent = attendance::Entity::find()
            .filter(attendance::Column::EmployeeId.eq(employee.id))
            .filter(attendance::Column::Date.gte(start))
            .filter(attendance::Column::Date.lt(end))
            .filter(attendance::Column::Status.eq(AttendanceStatus::Absent.as_str()))
            .count(&self.database)
            .await? as i64;
        let total_days = days_in_month(anchor)?;

        Ok(MonthlyAttendanceSummary {
            total_days,
            present,
            absent,
            unmarked: total_days - (present + absent),
        })
    }

    /// Live current-month numbers for the employee dashboard. Read-only:
    /// unlike the reconciler it does not materialize a salary row.
    pub async fn employee_dashboard(
        &self,
        employee_id: &str,
        today: NaiveDate,
    ) -> ResultEngine<EmployeeDashboard> {
        let employee = require_employee(&self.database, employee_id).await?;
        let (start, end) = month_bounds(today)?;
        let total_days = days_in_month(today)?;

        let days_worked = attendance::Entity::find()
            .filter(attendance::Column::EmployeeId.eq(employee.id.clone()))
            .filter(attendance::Column::Date.gte(start))
            .filter(attendance::Column::Date.lt(end))
            .filter(attendance::Column::Status.eq(AttendanceStatus::Present.as_str()))
            .count(&self.database)
            .await? as i64;

        let salary = salaries::Entity::find()
            .filter(salaries::Column::EmployeeId.eq(employee.id.clone()))
            .filter(salaries::Column::Month.eq(month_key(today)))
            .one(&self.database)
            .await?;
        let total_deductions = match &salary {
            Some(row) => sum_deductions_on(&self.database, &row.id).await?,
            None => Decimal::ZERO,
        };

        let salary_balance = employee.base_salary * Decimal::from(days_worked);
        let final_salary = salary_balance - total_deductions;
        let attendance_percentage = if total_days > 0 {
            (Decimal::from(days_worked) / Decimal::from(total_days) * Decimal::from(100))
                .round_dp(2)
        } else {
            Decimal::ZERO
        };

        Ok(EmployeeDashboard {
            employee_id: employee.id,
            name: employee.name,
            base_salary: employee.base_salary,
            days_worked,
            total_days,
            attendance_percentage,
            salary_balance,
            total_deductions,
            final_salary,
        })
    }
}

async fn require_employee<C: ConnectionTrait>(
    db: &C,
    employee_id: &str,
) -> ResultEngine<employees::Model> {
    employees::Entity::find_by_id(employee_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::NotFound("employee not exists".to_string()))
}

async fn sum_deductions_on<C: ConnectionTrait>(db: &C, salary_id: &str) -> ResultEngine<Decimal> {
    Ok(deductions::Entity::find()
        .filter(deductions::Column::SalaryId.eq(salary_id))
        .all(db)
        .await?
        .iter()
        .map(|row| row.amount)
        .sum())
}

/// Get-or-create the (employee, month) salary row, seeded with the
/// employee's current base salary. A lost creation race falls back to the
/// winner's row.
async fn get_or_create_salary_on<C: ConnectionTrait>(
    db: &C,
    employee: &employees::Model,
    month: &str,
) -> ResultEngine<salaries::Model> {
    let existing = salaries::Entity::find()
        .filter(salaries::Column::EmployeeId.eq(employee.id.clone()))
        .filter(salaries::Column::Month.eq(month))
        .one(db)
        .await?;
    if let Some(row) = existing {
        return Ok(row);
    }

    let now = Utc::now();
    let inserted = salaries::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        employee_id: Set(employee.id.clone()),
        month: Set(month.to_string()),
        base_salary: Set(employee.base_salary),
        total_deductions: Set(Decimal::ZERO),
        final_salary: Set(Decimal::ZERO),
        days_worked: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await;

    match inserted {
        Ok(row) => Ok(row),
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            salaries::Entity::find()
                .filter(salaries::Column::EmployeeId.eq(employee.id.clone()))
                .filter(salaries::Column::Month.eq(month))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::NotFound("salary not exists".to_string()))
        }
        Err(err) => Err(EngineError::Database(err)),
    }
}

/// Re-derive a month's salary row from its attendance and deduction rows.
pub(crate) async fn recompute_salary_on<C: ConnectionTrait>(
    db: &C,
    employee: &employees::Model,
    anchor: NaiveDate,
) -> ResultEngine<salaries::Model> {
    let month = month_key(anchor);
    let salary = get_or_create_salary_on(db, employee, &month).await?;
    let (start, end) = month_bounds(anchor)?;

    let days_worked = attendance::Entity::find()
        .filter(attendance::Column::EmployeeId.eq(employee.id.clone()))
        .filter(attendance::Column::Date.gte(start))
        .filter(attendance::Column::Date.lt(end))
        .filter(attendance::Column::Status.eq(AttendanceStatus::Present.as_str()))
        .count(db)
        .await? as i32;

    let total_deductions = sum_deductions_on(db, &salary.id).await?;
    let final_salary = salary.base_salary * Decimal::from(days_worked) - total_deductions;

    let mut active: salaries::ActiveModel = salary.into();
    active.days_worked = Set(days_worked);
    active.total_deductions = Set(total_deductions);
    active.final_salary = Set(final_salary);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}
