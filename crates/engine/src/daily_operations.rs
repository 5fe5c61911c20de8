//! Daily operations root aggregate.
//!
//! One row per (manager, date), get-or-created idempotently. Feed, expense,
//! medicine and milk-distribution records all hang off this row. There is no
//! deletion path.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "daily_operations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub manager_id: String,
    pub date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::feed_records::Entity")]
    FeedRecords,
    #[sea_orm(has_many = "super::expense_records::Entity")]
    ExpenseRecords,
    #[sea_orm(has_many = "super::medicine_records::Entity")]
    MedicineRecords,
    #[sea_orm(has_many = "super::milk_distribution::Entity")]
    MilkDistribution,
}

impl Related<super::feed_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeedRecords.def()
    }
}

impl Related<super::expense_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseRecords.def()
    }
}

impl Related<super::medicine_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MedicineRecords.def()
    }
}

impl Related<super::milk_distribution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MilkDistribution.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
