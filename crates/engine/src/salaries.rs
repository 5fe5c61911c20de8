//! Salaries table.
//!
//! One row per (employee, month). The row is derived state: every attendance
//! or deduction write recomputes `days_worked`, `total_deductions` and
//! `final_salary` from the source rows, so the row can never drift.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "salaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub employee_id: String,
    /// `YYYY-MM` month key.
    pub month: String,
    pub base_salary: Decimal,
    pub total_deductions: Decimal,
    pub final_salary: Decimal,
    pub days_worked: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::deductions::Entity")]
    Deductions,
}

impl Related<super::deductions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deductions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
