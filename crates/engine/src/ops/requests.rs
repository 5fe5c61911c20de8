//! Inter-seller milk requests and the borrow/lend obligations they create.
//!
//! Lifecycle: `pending` -> `on_hold` (a lender accepted, obligation row
//! created) -> `received` (borrower confirmed, obligation settled, ledger
//! receipt inserted). `pending` -> `rejected` is the requester withdrawing.
//! Every transition is a guarded conditional update on the expected status:
//! first writer wins, the loser matches zero rows.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    BorrowLendRecord, EngineError, MilkReceipt, MilkRequest, ResultEngine, borrow_lend, locations,
    milk_received,
    milk_received::{MilkSource, ReceiptStatus},
    milk_requests,
    milk_requests::RequestStatus,
    sellers,
    util::ensure_positive,
};

use super::{
    Engine,
    ledger::{remaining_milk_on, require_seller},
    notifications::notify,
    with_tx,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorrowDirection {
    Borrowed,
    Lent,
}

/// One side of the borrow/lend history, as a seller sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct BorrowLendEntry {
    pub date: NaiveDate,
    pub direction: BorrowDirection,
    pub counterparty: String,
    pub quantity: Decimal,
    pub settled: bool,
}

async fn location_name_of<C: ConnectionTrait>(
    db: &C,
    seller: &sellers::Model,
) -> ResultEngine<String> {
    Ok(locations::Entity::find_by_id(seller.location_id.clone())
        .one(db)
        .await?
        .map(|location| location.name)
        .unwrap_or_default())
}

impl Engine {
    /// Open a milk request and fan a notification out to every other active
    /// seller.
    pub async fn create_request(
        &self,
        from_seller_id: &str,
        quantity: Decimal,
    ) -> ResultEngine<MilkRequest> {
        ensure_positive(quantity, "quantity")?;

        with_tx!(self, |tx| {
            let requester = require_seller(&tx, from_seller_id).await?;
            let location_name = location_name_of(&tx, &requester).await?;

            let now = Utc::now();
            let row = milk_requests::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                from_seller_id: Set(requester.id.clone()),
                to_seller_id: Set(None),
                quantity: Set(quantity),
                status: Set(RequestStatus::Pending.as_str().to_string()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&tx)
            .await?;

            let message = format!(
                "New milk request from {} ({location_name}). Quantity: {quantity}L",
                requester.name
            );
            let others = sellers::Entity::find()
                .filter(sellers::Column::Active.eq(true))
                .filter(sellers::Column::Id.ne(requester.id.clone()))
                .all(&tx)
                .await?;
            for seller in &others {
                notify(&tx, &seller.user_id, &message).await?;
            }

            Ok(MilkRequest::try_from(row)?)
        })
    }

    /// Accept a pending request as the lender.
    ///
    /// The acceptor's remaining stock must cover the quantity. Two sellers
    /// racing on the same request cannot both win: the `pending -> on_hold`
    /// update is conditional on the status still being `pending`, and the
    /// loser gets a not-found error.
    pub async fn accept_request(
        &self,
        accepting_seller_id: &str,
        request_id: Uuid,
        today: NaiveDate,
    ) -> ResultEngine<BorrowLendRecord> {
        with_tx!(self, |tx| {
            let acceptor = require_seller(&tx, accepting_seller_id).await?;

            let request = milk_requests::Entity::find_by_id(request_id.to_string())
                .filter(milk_requests::Column::Status.eq(RequestStatus::Pending.as_str()))
                .one(&tx)
                .await?
                .ok_or_else(|| {
                    EngineError::NotFound("milk request not exists or already accepted".to_string())
                })?;
            if request.from_seller_id == acceptor.id {
                return Err(EngineError::Validation(
                    "cannot accept your own milk request".to_string(),
                ));
            }

            let available = remaining_milk_on(&tx, &acceptor.id).await?;
            if available < request.quantity {
                return Err(EngineError::InsufficientStock {
                    available,
                    requested: request.quantity,
                });
            }

            let claimed = milk_requests::Entity::update_many()
                .col_expr(
                    milk_requests::Column::ToSellerId,
                    Expr::value(acceptor.id.clone()),
                )
                .col_expr(
                    milk_requests::Column::Status,
                    Expr::value(RequestStatus::OnHold.as_str()),
                )
                .col_expr(milk_requests::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(milk_requests::Column::Id.eq(request_id.to_string()))
                .filter(milk_requests::Column::Status.eq(RequestStatus::Pending.as_str()))
                .exec(&tx)
                .await?;
            if claimed.rows_affected == 0 {
                return Err(EngineError::NotFound(
                    "milk request not exists or already accepted".to_string(),
                ));
            }

            let record = borrow_lend::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                borrower_seller_id: Set(request.from_seller_id.clone()),
                lender_seller_id: Set(acceptor.id.clone()),
                quantity: Set(request.quantity),
                borrow_date: Set(today),
                settled: Set(false),
                request_id: Set(request.id.clone()),
                created_at: Set(Utc::now()),
            }
            .insert(&tx)
            .await?;

            let requester = require_seller(&tx, &request.from_seller_id).await?;
            let location_name = location_name_of(&tx, &acceptor).await?;
            let message = format!(
                "Your milk request for {}L has been accepted by {} ({location_name}). \
                 Please confirm receipt when you physically receive the milk.",
                request.quantity, acceptor.name
            );
            notify(&tx, &requester.user_id, &message).await?;

            Ok(BorrowLendRecord::try_from(record)?)
        })
    }

    /// The borrower confirms physical receipt: the request terminates, the
    /// obligation settles, and a ledger receipt is inserted dated to the
    /// obligation's borrow date so the arithmetic matches the day the
    /// transfer was agreed.
    pub async fn mark_received(
        &self,
        requesting_seller_id: &str,
        request_id: Uuid,
    ) -> ResultEngine<MilkReceipt> {
        with_tx!(self, |tx| {
            let requester = require_seller(&tx, requesting_seller_id).await?;

            let request = milk_requests::Entity::find_by_id(request_id.to_string())
                .filter(milk_requests::Column::FromSellerId.eq(requester.id.clone()))
                .filter(milk_requests::Column::Status.eq(RequestStatus::OnHold.as_str()))
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("milk request not exists".to_string()))?;

            let finished = milk_requests::Entity::update_many()
                .col_expr(
                    milk_requests::Column::Status,
                    Expr::value(RequestStatus::Received.as_str()),
                )
                .col_expr(milk_requests::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(milk_requests::Column::Id.eq(request_id.to_string()))
                .filter(milk_requests::Column::Status.eq(RequestStatus::OnHold.as_str()))
                .exec(&tx)
                .await?;
            if finished.rows_affected == 0 {
                return Err(EngineError::NotFound("milk request not exists".to_string()));
            }

            let obligation = borrow_lend::Entity::find()
                .filter(borrow_lend::Column::RequestId.eq(request.id.clone()))
                .filter(borrow_lend::Column::Settled.eq(false))
                .one(&tx)
                .await?
                .ok_or_else(|| {
                    EngineError::Conflict("borrow/lend record already settled".to_string())
                })?;

            let settled = borrow_lend::Entity::update_many()
                .col_expr(borrow_lend::Column::Settled, Expr::value(true))
                .filter(borrow_lend::Column::Id.eq(obligation.id.clone()))
                .filter(borrow_lend::Column::Settled.eq(false))
                .exec(&tx)
                .await?;
            if settled.rows_affected == 0 {
                return Err(EngineError::Conflict(
                    "borrow/lend record already settled".to_string(),
                ));
            }

            let receipt = milk_received::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                seller_id: Set(requester.id.clone()),
                manager_id: Set(None),
                quantity: Set(request.quantity),
                date: Set(obligation.borrow_date),
                source: Set(MilkSource::InterSeller.as_str().to_string()),
                status: Set(ReceiptStatus::Received.as_str().to_string()),
                created_at: Set(Utc::now()),
            }
            .insert(&tx)
            .await?;

            let lender_id = request.to_seller_id.clone().ok_or_else(|| {
                EngineError::Conflict("milk request has no lender".to_string())
            })?;
            let lender = require_seller(&tx, &lender_id).await?;
            let location_name = location_name_of(&tx, &requester).await?;
            let message = format!(
                "The milk you provided ({}L) has been received by {} ({location_name}). \
                 Transaction completed.",
                request.quantity, requester.name
            );
            notify(&tx, &lender.user_id, &message).await?;

            Ok(MilkReceipt::try_from(receipt)?)
        })
    }

    /// The requester withdraws their own still-pending request.
    pub async fn reject_request(
        &self,
        from_seller_id: &str,
        request_id: Uuid,
    ) -> ResultEngine<MilkRequest> {
        with_tx!(self, |tx| {
            let requester = require_seller(&tx, from_seller_id).await?;

            let request = milk_requests::Entity::find_by_id(request_id.to_string())
                .filter(milk_requests::Column::FromSellerId.eq(requester.id.clone()))
                .filter(milk_requests::Column::Status.eq(RequestStatus::Pending.as_str()))
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("milk request not exists".to_string()))?;

            let rejected = milk_requests::Entity::update_many()
                .col_expr(
                    milk_requests::Column::Status,
                    Expr::value(RequestStatus::Rejected.as_str()),
                )
                .col_expr(milk_requests::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(milk_requests::Column::Id.eq(request_id.to_string()))
                .filter(milk_requests::Column::Status.eq(RequestStatus::Pending.as_str()))
                .exec(&tx)
                .await?;
            if rejected.rows_affected == 0 {
                return Err(EngineError::NotFound("milk request not exists".to_string()));
            }

            let mut model = request;
            model.status = RequestStatus::Rejected.as_str().to_string();
            Ok(MilkRequest::try_from(model)?)
        })
    }

    /// Pending requests from other sellers, newest first.
    pub async fn list_incoming_requests(&self, seller_id: &str) -> ResultEngine<Vec<MilkRequest>> {
        require_seller(&self.database, seller_id).await?;

        let rows = milk_requests::Entity::find()
            .filter(milk_requests::Column::Status.eq(RequestStatus::Pending.as_str()))
            .filter(milk_requests::Column::FromSellerId.ne(seller_id))
            .order_by_desc(milk_requests::Column::CreatedAt)
            .all(&self.database)
            .await?;
        rows.into_iter().map(MilkRequest::try_from).collect()
    }

    /// The seller's own requests, newest first.
    pub async fn list_outgoing_requests(&self, seller_id: &str) -> ResultEngine<Vec<MilkRequest>> {
        require_seller(&self.database, seller_id).await?;

        let rows = milk_requests::Entity::find()
            .filter(milk_requests::Column::FromSellerId.eq(seller_id))
            .order_by_desc(milk_requests::Column::CreatedAt)
            .all(&self.database)
            .await?;
        rows.into_iter().map(MilkRequest::try_from).collect()
    }

    /// Both sides of the seller's borrow/lend history, newest first.
    pub async fn borrow_lend_history(
        &self,
        seller_id: &str,
    ) -> ResultEngine<Vec<BorrowLendEntry>> {
        require_seller(&self.database, seller_id).await?;

        let rows = borrow_lend::Entity::find()
            .filter(
                Condition::any()
                    .add(borrow_lend::Column::BorrowerSellerId.eq(seller_id))
                    .add(borrow_lend::Column::LenderSellerId.eq(seller_id)),
            )
            .order_by_desc(borrow_lend::Column::BorrowDate)
            .all(&self.database)
            .await?;

        let counterparty_ids: Vec<String> = rows
            .iter()
            .map(|row| {
                if row.borrower_seller_id == seller_id {
                    row.lender_seller_id.clone()
                } else {
                    row.borrower_seller_id.clone()
                }
            })
            .collect();
        let names: HashMap<String, String> = if counterparty_ids.is_empty() {
            HashMap::new()
        } else {
            sellers::Entity::find()
                .filter(sellers::Column::Id.is_in(counterparty_ids))
                .all(&self.database)
                .await?
                .into_iter()
                .map(|seller| (seller.id, seller.name))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                let (direction, counterparty_id) = if row.borrower_seller_id == seller_id {
                    (BorrowDirection::Borrowed, &row.lender_seller_id)
                } else {
                    (BorrowDirection::Lent, &row.borrower_seller_id)
                };
                BorrowLendEntry {
                    date: row.borrow_date,
                    direction,
                    counterparty: names.get(counterparty_id).cloned().unwrap_or_default(),
                    quantity: row.quantity,
                    settled: row.settled,
                }
            })
            .collect())
    }
}
