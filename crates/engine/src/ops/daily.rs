//! Daily operations root: idempotent (manager, date) scoping for feed,
//! expense, medicine and distribution records.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, daily_operations, expense_records, feed_records, managers,
    medicine_records, milk_distribution,
    util::{ensure_not_negative, ensure_positive},
};

use super::{Engine, normalize_required, with_tx};

/// Everything recorded under one (manager, date) root.
#[derive(Clone, Debug, PartialEq)]
pub struct DailyReport {
    pub record: daily_operations::Model,
    pub feed_records: Vec<feed_records::Model>,
    pub expense_records: Vec<expense_records::Model>,
    pub medicine_records: Vec<medicine_records::Model>,
    pub milk_distribution: Option<milk_distribution::Model>,
}

pub(crate) async fn require_manager<C: ConnectionTrait>(
    db: &C,
    manager_id: &str,
) -> ResultEngine<managers::Model> {
    managers::Entity::find_by_id(manager_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::NotFound("manager not exists".to_string()))
}

/// Get-or-create the daily operations row. Losing a concurrent creation
/// race falls back to re-selecting the winner's row.
pub(crate) async fn get_or_create_on<C: ConnectionTrait>(
    db: &C,
    manager_id: &str,
    date: NaiveDate,
) -> ResultEngine<daily_operations::Model> {
    let existing = daily_operations::Entity::find()
        .filter(daily_operations::Column::ManagerId.eq(manager_id))
        .filter(daily_operations::Column::Date.eq(date))
        .one(db)
        .await?;
    if let Some(row) = existing {
        return Ok(row);
    }

    let inserted = daily_operations::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        manager_id: Set(manager_id.to_string()),
        date: Set(date),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await;

    match inserted {
        Ok(row) => Ok(row),
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            daily_operations::Entity::find()
                .filter(daily_operations::Column::ManagerId.eq(manager_id))
                .filter(daily_operations::Column::Date.eq(date))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::NotFound("daily operations not exists".to_string()))
        }
        Err(err) => Err(EngineError::Database(err)),
    }
}

impl Engine {
    /// The (manager, date) root aggregate, created on first touch.
    pub async fn daily_operations(
        &self,
        manager_id: &str,
        date: NaiveDate,
    ) -> ResultEngine<daily_operations::Model> {
        with_tx!(self, |tx| {
            require_manager(&tx, manager_id).await?;
            get_or_create_on(&tx, manager_id, date).await
        })
    }

    /// Add a feed record to the day, or update the identified one.
    pub async fn record_feed(
        &self,
        manager_id: &str,
        date: NaiveDate,
        record_id: Option<Uuid>,
        feed_type: &str,
        quantity: Decimal,
        cost: Decimal,
    ) -> ResultEngine<feed_records::Model> {
        let feed_type = normalize_required(feed_type, "feed type")?;
        ensure_positive(quantity, "quantity")?;
        ensure_not_negative(cost, "cost")?;

        with_tx!(self, |tx| {
            require_manager(&tx, manager_id).await?;
            let root = get_or_create_on(&tx, manager_id, date).await?;

            let record = match record_id {
                Some(id) => {
                    let row = feed_records::Entity::find_by_id(id.to_string())
                        .filter(feed_records::Column::RecordId.eq(root.id.clone()))
                        .one(&tx)
                        .await?
                        .ok_or_else(|| {
                            EngineError::NotFound("feed record not exists".to_string())
                        })?;
                    let mut active: feed_records::ActiveModel = row.into();
                    active.feed_type = Set(feed_type.clone());
                    active.quantity = Set(quantity);
                    active.cost = Set(cost);
                    active.update(&tx).await?
                }
                None => {
                    feed_records::ActiveModel {
                        id: Set(Uuid::new_v4().to_string()),
                        record_id: Set(root.id.clone()),
                        date: Set(date),
                        feed_type: Set(feed_type.clone()),
                        quantity: Set(quantity),
                        cost: Set(cost),
                        created_at: Set(Utc::now()),
                    }
                    .insert(&tx)
                    .await?
                }
            };
            Ok(record)
        })
    }

    /// Add an expense record to the day, or update the identified one.
    pub async fn record_expense(
        &self,
        manager_id: &str,
        date: NaiveDate,
        record_id: Option<Uuid>,
        category: &str,
        amount: Decimal,
    ) -> ResultEngine<expense_records::Model> {
        let category = normalize_required(category, "category")?;
        ensure_positive(amount, "amount")?;

        with_tx!(self, |tx| {
            require_manager(&tx, manager_id).await?;
            let root = get_or_create_on(&tx, manager_id, date).await?;

            let record = match record_id {
                Some(id) => {
                    let row = expense_records::Entity::find_by_id(id.to_string())
                        .filter(expense_records::Column::RecordId.eq(root.id.clone()))
                        .one(&tx)
                        .await?
                        .ok_or_else(|| {
                            EngineError::NotFound("expense record not exists".to_string())
                        })?;
                    let mut active: expense_records::ActiveModel = row.into();
                    active.category = Set(category.clone());
                    active.amount = Set(amount);
                    active.update(&tx).await?
                }
                None => {
                    expense_records::ActiveModel {
                        id: Set(Uuid::new_v4().to_string()),
                        record_id: Set(root.id.clone()),
                        date: Set(date),
                        category: Set(category.clone()),
                        amount: Set(amount),
                        created_at: Set(Utc::now()),
                    }
                    .insert(&tx)
                    .await?
                }
            };
            Ok(record)
        })
    }

    /// Add a medicine record to the day, or update the identified one.
    pub async fn record_medicine(
        &self,
        manager_id: &str,
        date: NaiveDate,
        record_id: Option<Uuid>,
        medicine_name: &str,
        cost: Decimal,
    ) -> ResultEngine<medicine_records::Model> {
        let medicine_name = normalize_required(medicine_name, "medicine name")?;
        ensure_positive(cost, "cost")?;

        with_tx!(self, |tx| {
            require_manager(&tx, manager_id).await?;
            let root = get_or_create_on(&tx, manager_id, date).await?;

            let record = match record_id {
                Some(id) => {
                    let row = medicine_records::Entity::find_by_id(id.to_string())
                        .filter(medicine_records::Column::RecordId.eq(root.id.clone()))
                        .one(&tx)
                        .await?
                        .ok_or_else(|| {
                            EngineError::NotFound("medicine record not exists".to_string())
                        })?;
                    let mut active: medicine_records::ActiveModel = row.into();
                    active.medicine_name = Set(medicine_name.clone());
                    active.cost = Set(cost);
                    active.update(&tx).await?
                }
                None => {
                    medicine_records::ActiveModel {
                        id: Set(Uuid::new_v4().to_string()),
                        record_id: Set(root.id.clone()),
                        date: Set(date),
                        medicine_name: Set(medicine_name.clone()),
                        cost: Set(cost),
                        created_at: Set(Utc::now()),
                    }
                    .insert(&tx)
                    .await?
                }
            };
            Ok(record)
        })
    }

    /// Everything recorded for a (manager, date), creating the root if the
    /// day has not been touched yet.
    pub async fn daily_report(
        &self,
        manager_id: &str,
        date: NaiveDate,
    ) -> ResultEngine<DailyReport> {
        let root = self.daily_operations(manager_id, date).await?;

        let feed = feed_records::Entity::find()
            .filter(feed_records::Column::RecordId.eq(root.id.clone()))
            .all(&self.database)
            .await?;
        let expenses = expense_records::Entity::find()
            .filter(expense_records::Column::RecordId.eq(root.id.clone()))
            .all(&self.database)
            .await?;
        let medicine = medicine_records::Entity::find()
            .filter(medicine_records::Column::RecordId.eq(root.id.clone()))
            .all(&self.database)
            .await?;
        let distribution = milk_distribution::Entity::find()
            .filter(milk_distribution::Column::RecordId.eq(root.id.clone()))
            .one(&self.database)
            .await?;

        Ok(DailyReport {
            record: root,
            feed_records: feed,
            expense_records: expenses,
            medicine_records: medicine,
            milk_distribution: distribution,
        })
    }
}
