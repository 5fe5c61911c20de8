//! Per-seller daily revenue totals.
//!
//! One row per (seller, date), replaced wholesale on every write; never
//! incremented. Canonical field set: `revenue`, `cash_sales`,
//! `online_sales`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "daily_totals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub seller_id: String,
    pub date: Date,
    pub revenue: Decimal,
    pub cash_sales: Decimal,
    pub online_sales: Decimal,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
