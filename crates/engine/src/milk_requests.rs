//! Milk request primitives.
//!
//! A request moves `pending` -> `on_hold` (a lender accepted) -> `received`
//! (the borrower confirmed physical receipt). `pending` -> `rejected` is the
//! alternate terminal: the requester withdrawing their own request.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    OnHold,
    Received,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::OnHold => "on_hold",
            Self::Received => "received",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<&str> for RequestStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "on_hold" => Ok(Self::OnHold),
            "received" => Ok(Self::Received),
            "rejected" => Ok(Self::Rejected),
            other => Err(EngineError::Validation(format!(
                "invalid request status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MilkRequest {
    pub id: Uuid,
    pub from_seller_id: String,
    pub to_seller_id: Option<String>,
    pub quantity: Decimal,
    pub status: RequestStatus,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "milk_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub from_seller_id: String,
    pub to_seller_id: Option<String>,
    pub quantity: Decimal,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::borrow_lend::Entity")]
    BorrowLendRecords,
}

impl Related<super::borrow_lend::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BorrowLendRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MilkRequest {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "milk request")?,
            from_seller_id: model.from_seller_id,
            to_seller_id: model.to_seller_id,
            quantity: model.quantity,
            status: RequestStatus::try_from(model.status.as_str())?,
        })
    }
}
