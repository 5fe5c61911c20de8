//! Feed records attached to a daily operations root.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "feed_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub record_id: String,
    pub date: Date,
    pub feed_type: String,
    pub quantity: Decimal,
    pub cost: Decimal,
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
