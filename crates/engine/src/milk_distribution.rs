//! Manager's daily milk-distribution summary.
//!
//! One row per daily operations root. `total_milk` is recomputed from the
//! `milk_received` rows of the day whenever milk is issued or a receipt is
//! confirmed; it is never incremented in place.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "milk_distribution")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub record_id: String,
    pub date: Date,
    pub total_milk: Decimal,
    pub leftover_milk: Decimal,
    pub leftover_sales: Decimal,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::daily_operations::Entity",
        from = "Column::RecordId",
        to = "super::daily_operations::Column::Id"
    )]
    DailyOperations,
}

impl Related<super::daily_operations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyOperations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
