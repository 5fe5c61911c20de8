//! Employees table.
//!
//! Employee ids are human readable (`EMP001`, ...) from the `id_sequences`
//! allocator. `base_salary` is the per-day rate the salary reconciler
//! multiplies by days worked.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub base_salary: Decimal,
    pub user_id: String,
    pub manager_id: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
