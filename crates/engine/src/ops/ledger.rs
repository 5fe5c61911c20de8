//! Ledger arithmetic: recompute-from-source aggregation over a seller's
//! receipts, sales and borrow/lend obligations.
//!
//! Nothing here trusts a stored counter. Remaining milk is always derived
//! fresh from the transaction rows, and absent aggregates count as zero.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, borrow_lend, daily_totals, milk_received,
    milk_received::{MilkSource, ReceiptStatus},
    sales, sellers,
    util::{ensure_not_negative, ensure_positive},
};

use super::{Engine, with_tx};

/// One seller's day at a glance, plus the all-time remaining stock.
#[derive(Clone, Debug, PartialEq)]
pub struct SellerDailySummary {
    pub date: NaiveDate,
    /// Inbound rows of the day, `pending` included: milk on its way still
    /// shows up on the dashboard.
    pub total_received: Decimal,
    pub farm_milk: Decimal,
    pub inter_seller_milk: Decimal,
    pub total_sold: Decimal,
    /// Unsettled quantity lent out with today's borrow date.
    pub total_lent: Decimal,
    /// All-time confirmed received - sold - unsettled lent.
    pub remaining_milk: Decimal,
    pub revenue: Decimal,
    pub cash_sales: Decimal,
    pub online_sales: Decimal,
    pub sales: Vec<sales::Model>,
}

/// All-time remaining stock for a seller, derived from source rows.
///
/// Only `received`-status receipts count; pending deliveries are not stock
/// yet. Callable inside a transaction so acceptance/sale checks see a
/// consistent snapshot.
pub(crate) async fn remaining_milk_on<C: ConnectionTrait>(
    db: &C,
    seller_id: &str,
) -> ResultEngine<Decimal> {
    let received: Decimal = milk_received::Entity::find()
        .filter(milk_received::Column::SellerId.eq(seller_id))
        .filter(milk_received::Column::Status.eq(ReceiptStatus::Received.as_str()))
        .all(db)
        .await?
        .iter()
        .map(|row| row.quantity)
        .sum();

    let sold: Decimal = sales::Entity::find()
        .filter(sales::Column::SellerId.eq(seller_id))
        .all(db)
        .await?
        .iter()
        .map(|row| row.quantity)
        .sum();

    let lent: Decimal = borrow_lend::Entity::find()
        .filter(borrow_lend::Column::LenderSellerId.eq(seller_id))
        .filter(borrow_lend::Column::Settled.eq(false))
        .all(db)
        .await?
        .iter()
        .map(|row| row.quantity)
        .sum();

    Ok(received - sold - lent)
}

pub(crate) async fn require_seller<C: ConnectionTrait>(
    db: &C,
    seller_id: &str,
) -> ResultEngine<sellers::Model> {
    sellers::Entity::find_by_id(seller_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::NotFound("seller not exists".to_string()))
}

impl Engine {
    /// Currently available, unsold, unlent milk for a seller.
    pub async fn remaining_milk(&self, seller_id: &str) -> ResultEngine<Decimal> {
        require_seller(&self.database, seller_id).await?;
        remaining_milk_on(&self.database, seller_id).await
    }

    /// Append a retail sale, enforcing the stock invariant at sale time.
    pub async fn record_sale(
        &self,
        seller_id: &str,
        date: NaiveDate,
        quantity: Decimal,
        customer_name: &str,
        total_amount: Decimal,
    ) -> ResultEngine<sales::Model> {
        ensure_positive(quantity, "quantity")?;
        ensure_not_negative(total_amount, "total amount")?;
        let customer_name = super::normalize_required(customer_name, "customer name")?;

        with_tx!(self, |tx| {
            require_seller(&tx, seller_id).await?;

            let available = remaining_milk_on(&tx, seller_id).await?;
            if quantity > available {
                return Err(EngineError::InsufficientStock {
                    available,
                    requested: quantity,
                });
            }

            let sale = sales::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                seller_id: Set(seller_id.to_string()),
                date: Set(date),
                quantity: Set(quantity),
                customer_name: Set(customer_name.clone()),
                total_amount: Set(total_amount),
                created_at: Set(Utc::now()),
            }
            .insert(&tx)
            .await?;
            Ok(sale)
        })
    }

    /// Wholesale upsert of the (seller, date) revenue totals.
    pub async fn record_daily_totals(
        &self,
        seller_id: &str,
        date: NaiveDate,
        cash_sales: Decimal,
        online_sales: Decimal,
    ) -> ResultEngine<daily_totals::Model> {
        ensure_not_negative(cash_sales, "cash sales")?;
        ensure_not_negative(online_sales, "online sales")?;
        let revenue = cash_sales + online_sales;

        with_tx!(self, |tx| {
            require_seller(&tx, seller_id).await?;

            let existing = daily_totals::Entity::find()
                .filter(daily_totals::Column::SellerId.eq(seller_id))
                .filter(daily_totals::Column::Date.eq(date))
                .one(&tx)
                .await?;

            let total = match existing {
                Some(row) => {
                    let mut active: daily_totals::ActiveModel = row.into();
                    active.revenue = Set(revenue);
                    active.cash_sales = Set(cash_sales);
                    active.online_sales = Set(online_sales);
                    active.update(&tx).await?
                }
                None => {
                    daily_totals::ActiveModel {
                        id: Set(Uuid::new_v4().to_string()),
                        seller_id: Set(seller_id.to_string()),
                        date: Set(date),
                        revenue: Set(revenue),
                        cash_sales: Set(cash_sales),
                        online_sales: Set(online_sales),
                        created_at: Set(Utc::now()),
                    }
                    .insert(&tx)
                    .await?
                }
            };
            Ok(total)
        })
    }

    /// Seller-logged inbound milk. Goes straight to `received`; no manager
    /// is attached and no distribution summary is touched.
    pub async fn record_milk_received(
        &self,
        seller_id: &str,
        date: NaiveDate,
        quantity: Decimal,
        source: MilkSource,
    ) -> ResultEngine<milk_received::Model> {
        ensure_positive(quantity, "quantity")?;

        with_tx!(self, |tx| {
            require_seller(&tx, seller_id).await?;

            let receipt = milk_received::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                seller_id: Set(seller_id.to_string()),
                manager_id: Set(None),
                quantity: Set(quantity),
                date: Set(date),
                source: Set(source.as_str().to_string()),
                status: Set(ReceiptStatus::Received.as_str().to_string()),
                created_at: Set(Utc::now()),
            }
            .insert(&tx)
            .await?;
            Ok(receipt)
        })
    }

    /// Daily dashboard numbers for a seller.
    pub async fn seller_daily_summary(
        &self,
        seller_id: &str,
        date: NaiveDate,
    ) -> ResultEngine<SellerDailySummary> {
        require_seller(&self.database, seller_id).await?;

        let inbound = milk_received::Entity::find()
            .filter(milk_received::Column::SellerId.eq(seller_id))
            .filter(milk_received::Column::Date.eq(date))
            .filter(milk_received::Column::Status.is_in([
                ReceiptStatus::Pending.as_str(),
                ReceiptStatus::Received.as_str(),
            ]))
            .all(&self.database)
            .await?;

        let mut total_received = Decimal::ZERO;
        let mut farm_milk = Decimal::ZERO;
        let mut inter_seller_milk = Decimal::ZERO;
        for row in &inbound {
            total_received += row.quantity;
            match row.source.as_str() {
                "from_farm" => farm_milk += row.quantity,
                "inter_seller" => inter_seller_milk += row.quantity,
                _ => {}
            }
        }

        let day_sales = sales::Entity::find()
            .filter(sales::Column::SellerId.eq(seller_id))
            .filter(sales::Column::Date.eq(date))
            .order_by_desc(sales::Column::CreatedAt)
            .all(&self.database)
            .await?;
        let total_sold: Decimal = day_sales.iter().map(|row| row.quantity).sum();

        let total_lent: Decimal = borrow_lend::Entity::find()
            .filter(borrow_lend::Column::LenderSellerId.eq(seller_id))
            .filter(borrow_lend::Column::BorrowDate.eq(date))
            .filter(borrow_lend::Column::Settled.eq(false))
            .all(&self.database)
            .await?
            .iter()
            .map(|row| row.quantity)
            .sum();

        let remaining_milk = remaining_milk_on(&self.database, seller_id).await?;

        let totals = daily_totals::Entity::find()
            .filter(daily_totals::Column::SellerId.eq(seller_id))
            .filter(daily_totals::Column::Date.eq(date))
            .one(&self.database)
            .await?;
        let (revenue, cash_sales, online_sales) = match &totals {
            Some(row) => (row.revenue, row.cash_sales, row.online_sales),
            None => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        };

        Ok(SellerDailySummary {
            date,
            total_received,
            farm_milk,
            inter_seller_milk,
            total_sold,
            total_lent,
            remaining_milk,
            revenue,
            cash_sales,
            online_sales,
            sales: day_sales,
        })
    }
}
