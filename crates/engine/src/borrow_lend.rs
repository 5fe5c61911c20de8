//! Borrow/lend obligations between sellers.
//!
//! Exactly one row is created when a milk request is accepted; `settled`
//! flips to true exactly once, when the borrower confirms receipt.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorrowLendRecord {
    pub id: Uuid,
    pub borrower_seller_id: String,
    pub lender_seller_id: String,
    pub quantity: Decimal,
    pub borrow_date: NaiveDate,
    pub settled: bool,
    pub request_id: Uuid,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "borrow_lend_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub borrower_seller_id: String,
    pub lender_seller_id: String,
    pub quantity: Decimal,
    pub borrow_date: Date,
    pub settled: bool,
    pub request_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::milk_requests::Entity",
        from = "Column::RequestId",
        to = "super::milk_requests::Column::Id"
    )]
    MilkRequests,
}

impl Related<super::milk_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MilkRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for BorrowLendRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "borrow/lend record")?,
            borrower_seller_id: model.borrower_seller_id,
            lender_seller_id: model.lender_seller_id,
            quantity: model.quantity,
            borrow_date: model.borrow_date,
            settled: model.settled,
            request_id: parse_uuid(&model.request_id, "milk request")?,
        })
    }
}
