//! Milk receipt primitives.
//!
//! A `MilkReceipt` is one inbound unit-of-record for a seller: either a
//! manager-issued farm delivery (starts `pending`, the seller confirms) or an
//! inter-seller transfer (inserted directly as `received` at settlement).

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilkSource {
    FromFarm,
    InterSeller,
}

impl MilkSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FromFarm => "from_farm",
            Self::InterSeller => "inter_seller",
        }
    }
}

impl TryFrom<&str> for MilkSource {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "from_farm" => Ok(Self::FromFarm),
            "inter_seller" => Ok(Self::InterSeller),
            other => Err(EngineError::Validation(format!(
                "invalid milk source: {other}"
            ))),
        }
    }
}

/// Receipt status only moves forward: `pending` to `received` or
/// `not_received`, decided once by the owning seller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Pending,
    Received,
    NotReceived,
}

impl ReceiptStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Received => "received",
            Self::NotReceived => "not_received",
        }
    }
}

impl TryFrom<&str> for ReceiptStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "received" => Ok(Self::Received),
            "not_received" => Ok(Self::NotReceived),
            other => Err(EngineError::Validation(format!(
                "invalid receipt status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MilkReceipt {
    pub id: Uuid,
    pub seller_id: String,
    pub manager_id: Option<String>,
    pub quantity: Decimal,
    pub date: NaiveDate,
    pub source: MilkSource,
    pub status: ReceiptStatus,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "milk_received")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub seller_id: String,
    pub manager_id: Option<String>,
    pub quantity: Decimal,
    pub date: Date,
    pub source: String,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MilkReceipt {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "milk receipt")?,
            seller_id: model.seller_id,
            manager_id: model.manager_id,
            quantity: model.quantity,
            date: model.date,
            source: MilkSource::try_from(model.source.as_str())?,
            status: ReceiptStatus::try_from(model.status.as_str())?,
        })
    }
}
