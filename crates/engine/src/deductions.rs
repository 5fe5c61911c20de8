//! Deductions table. Append-only children of a salary row; creating one
//! triggers a salary recompute.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "deductions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub salary_id: String,
    pub amount: Decimal,
    pub reason: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::salaries::Entity",
        from = "Column::SalaryId",
        to = "super::salaries::Column::Id"
    )]
    Salaries,
}

impl Related<super::salaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Salaries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
