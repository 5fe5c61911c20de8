//! Manager-issued milk distribution and receipt confirmation.
//!
//! Issuance fans the day's quantity out evenly across a location's active
//! sellers and refreshes the manager's distribution summary in the same
//! transaction. The summary is recomputed from the `milk_received` rows of
//! the date, never incremented.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, SqlErr, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, MilkReceipt, ResultEngine, daily_operations, locations, milk_distribution,
    milk_received,
    milk_received::{MilkSource, ReceiptStatus},
    sellers,
    util::{ensure_not_negative, ensure_positive},
};

use super::{
    Engine,
    daily::{get_or_create_on, require_manager},
    notifications::notify,
    with_tx,
};

/// What a distribution run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct DistributionOutcome {
    pub date: NaiveDate,
    pub seller_count: usize,
    /// The exact per-seller split; only notification text rounds it.
    pub quantity_per_seller: Decimal,
}

/// A seller's verdict on a pending receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptDecision {
    Received,
    NotReceived,
}

impl ReceiptDecision {
    fn status(self) -> ReceiptStatus {
        match self {
            Self::Received => ReceiptStatus::Received,
            Self::NotReceived => ReceiptStatus::NotReceived,
        }
    }
}

/// Get-or-create the day's distribution summary row under a daily
/// operations root.
async fn distribution_row_on<C: ConnectionTrait>(
    db: &C,
    root: &daily_operations::Model,
) -> ResultEngine<milk_distribution::Model> {
    let existing = milk_distribution::Entity::find()
        .filter(milk_distribution::Column::RecordId.eq(root.id.clone()))
        .one(db)
        .await?;
    if let Some(row) = existing {
        return Ok(row);
    }

    let inserted = milk_distribution::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        record_id: Set(root.id.clone()),
        date: Set(root.date),
        total_milk: Set(Decimal::ZERO),
        leftover_milk: Set(Decimal::ZERO),
        leftover_sales: Set(Decimal::ZERO),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await;

    match inserted {
        Ok(row) => Ok(row),
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            milk_distribution::Entity::find()
                .filter(milk_distribution::Column::RecordId.eq(root.id.clone()))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::NotFound("milk distribution not exists".to_string()))
        }
        Err(err) => Err(EngineError::Database(err)),
    }
}

/// Recompute the summary's `total_milk` from every `milk_received` row of
/// the date, system-wide, and rewrite it on the root's summary row.
pub(crate) async fn refresh_distribution_summary_on<C: ConnectionTrait>(
    db: &C,
    root: &daily_operations::Model,
) -> ResultEngine<milk_distribution::Model> {
    let total: Decimal = milk_received::Entity::find()
        .filter(milk_received::Column::Date.eq(root.date))
        .all(db)
        .await?
        .iter()
        .map(|row| row.quantity)
        .sum();

    let row = distribution_row_on(db, root).await?;
    let mut active: milk_distribution::ActiveModel = row.into();
    active.total_milk = Set(total);
    Ok(active.update(db).await?)
}

impl Engine {
    /// Split `total_quantity` evenly across a location's active sellers:
    /// one pending farm receipt and one notification per seller, then the
    /// manager's distribution summary for the date.
    pub async fn distribute(
        &self,
        manager_id: &str,
        location_id: &str,
        date: NaiveDate,
        total_quantity: Decimal,
    ) -> ResultEngine<DistributionOutcome> {
        ensure_positive(total_quantity, "quantity")?;

        with_tx!(self, |tx| {
            require_manager(&tx, manager_id).await?;
            locations::Entity::find_by_id(location_id)
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("location not exists".to_string()))?;

            let active_sellers = sellers::Entity::find()
                .filter(sellers::Column::LocationId.eq(location_id))
                .filter(sellers::Column::Active.eq(true))
                .all(&tx)
                .await?;
            if active_sellers.is_empty() {
                return Err(EngineError::Validation(
                    "no active sellers in this location".to_string(),
                ));
            }

            let per_seller = total_quantity / Decimal::from(active_sellers.len() as u64);
            let message = format!(
                "You have a pending milk delivery of {}L from your manager for {date}.",
                per_seller.round_dp(2)
            );

            for seller in &active_sellers {
                milk_received::ActiveModel {
                    id: Set(Uuid::new_v4().to_string()),
                    seller_id: Set(seller.id.clone()),
                    manager_id: Set(Some(manager_id.to_string())),
                    quantity: Set(per_seller),
                    date: Set(date),
                    source: Set(MilkSource::FromFarm.as_str().to_string()),
                    status: Set(ReceiptStatus::Pending.as_str().to_string()),
                    created_at: Set(Utc::now()),
                }
                .insert(&tx)
                .await?;
                notify(&tx, &seller.user_id, &message).await?;
            }

            let root = get_or_create_on(&tx, manager_id, date).await?;
            refresh_distribution_summary_on(&tx, &root).await?;

            Ok(DistributionOutcome {
                date,
                seller_count: active_sellers.len(),
                quantity_per_seller: per_seller,
            })
        })
    }

    /// A seller settles a pending receipt one way or the other. The
    /// transition is one-way; a receipt already decided conflicts.
    pub async fn confirm_receipt(
        &self,
        seller_id: &str,
        receipt_id: Uuid,
        decision: ReceiptDecision,
    ) -> ResultEngine<MilkReceipt> {
        with_tx!(self, |tx| {
            let seller = super::ledger::require_seller(&tx, seller_id).await?;

            let row = milk_received::Entity::find_by_id(receipt_id.to_string())
                .filter(milk_received::Column::SellerId.eq(seller_id))
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("milk receipt not exists".to_string()))?;
            if row.status != ReceiptStatus::Pending.as_str() {
                return Err(EngineError::Conflict(
                    "receipt already confirmed".to_string(),
                ));
            }

            let new_status = decision.status();
            let updated = milk_received::Entity::update_many()
                .col_expr(
                    milk_received::Column::Status,
                    Expr::value(new_status.as_str()),
                )
                .filter(milk_received::Column::Id.eq(receipt_id.to_string()))
                .filter(milk_received::Column::Status.eq(ReceiptStatus::Pending.as_str()))
                .exec(&tx)
                .await?;
            if updated.rows_affected == 0 {
                return Err(EngineError::Conflict(
                    "receipt already confirmed".to_string(),
                ));
            }

            if let Some(manager_id) = &row.manager_id {
                let manager = require_manager(&tx, manager_id).await?;
                let message = match decision {
                    ReceiptDecision::Received => format!(
                        "Seller {} has confirmed receipt of {}L for {}.",
                        seller.name, row.quantity, row.date
                    ),
                    ReceiptDecision::NotReceived => format!(
                        "Seller {} has marked the distribution of {}L for {} as not received.",
                        seller.name, row.quantity, row.date
                    ),
                };
                notify(&tx, &manager.user_id, &message).await?;

                // Lost milk never adjusts totals; it is simply excluded
                // from here on.
                if decision == ReceiptDecision::Received {
                    let root = get_or_create_on(&tx, manager_id, row.date).await?;
                    refresh_distribution_summary_on(&tx, &root).await?;
                }
            }

            let mut model = row;
            model.status = new_status.as_str().to_string();
            Ok(MilkReceipt::try_from(model)?)
        })
    }

    /// Receipts still awaiting (or denied) confirmation for a seller.
    pub async fn list_pending_receipts(&self, seller_id: &str) -> ResultEngine<Vec<MilkReceipt>> {
        super::ledger::require_seller(&self.database, seller_id).await?;

        let rows = milk_received::Entity::find()
            .filter(milk_received::Column::SellerId.eq(seller_id))
            .filter(milk_received::Column::Status.is_in([
                ReceiptStatus::Pending.as_str(),
                ReceiptStatus::NotReceived.as_str(),
            ]))
            .order_by_desc(milk_received::Column::Date)
            .all(&self.database)
            .await?;
        rows.into_iter().map(MilkReceipt::try_from).collect()
    }

    /// Issuances by a manager that no seller has confirmed yet.
    pub async fn list_manager_pending(&self, manager_id: &str) -> ResultEngine<Vec<MilkReceipt>> {
        require_manager(&self.database, manager_id).await?;

        let rows = milk_received::Entity::find()
            .filter(milk_received::Column::ManagerId.eq(manager_id))
            .filter(milk_received::Column::Status.eq(ReceiptStatus::Pending.as_str()))
            .order_by_desc(milk_received::Column::Date)
            .all(&self.database)
            .await?;
        rows.into_iter().map(MilkReceipt::try_from).collect()
    }

    /// Manager corrections to the day's leftover milk and leftover sales.
    pub async fn update_leftover(
        &self,
        manager_id: &str,
        date: NaiveDate,
        leftover_milk: Option<Decimal>,
        leftover_sales: Option<Decimal>,
    ) -> ResultEngine<milk_distribution::Model> {
        if let Some(value) = leftover_milk {
            ensure_not_negative(value, "leftover milk")?;
        }
        if let Some(value) = leftover_sales {
            ensure_not_negative(value, "leftover sales")?;
        }

        with_tx!(self, |tx| {
            require_manager(&tx, manager_id).await?;
            let root = get_or_create_on(&tx, manager_id, date).await?;
            let row = distribution_row_on(&tx, &root).await?;

            let mut active: milk_distribution::ActiveModel = row.into();
            if let Some(value) = leftover_milk {
                active.leftover_milk = Set(value);
            }
            if let Some(value) = leftover_sales {
                active.leftover_sales = Set(value);
            }
            Ok(active.update(&tx).await?)
        })
    }
}
