//! Milk distribution endpoints: issuance and receipt confirmation.

use api_types::milk::{DistributeNew, DistributeResult, ReceiptConfirm, ReceiptView};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::users;

fn receipt_view(receipt: engine::MilkReceipt) -> ReceiptView {
    ReceiptView {
        receipt_id: receipt.id.to_string(),
        quantity: receipt.quantity,
        date: receipt.date,
        source: receipt.source.as_str().to_string(),
        status: receipt.status.as_str().to_string(),
        manager_id: receipt.manager_id,
    }
}

fn parse_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw).map_err(|_| ServerError::Generic("invalid id".to_string()))
}

pub async fn distribute(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DistributeNew>,
) -> Result<Json<DistributeResult>, ServerError> {
    let manager = state.engine.manager_by_user(&user.id).await?;

    let date = payload.date.unwrap_or_else(crate::server::today);
    let outcome = state
        .engine
        .distribute(&manager.id, &payload.location_id, date, payload.quantity)
        .await?;
    Ok(Json(DistributeResult {
        date: outcome.date,
        seller_count: outcome.seller_count,
        quantity_per_seller: outcome.quantity_per_seller,
    }))
}

pub async fn manager_pending(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<ReceiptView>>, ServerError> {
    let manager = state.engine.manager_by_user(&user.id).await?;
    let receipts = state.engine.list_manager_pending(&manager.id).await?;
    Ok(Json(receipts.into_iter().map(receipt_view).collect()))
}

pub async fn pending_receipts(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<ReceiptView>>, ServerError> {
    let seller = state.engine.seller_by_user(&user.id).await?;
    let receipts = state.engine.list_pending_receipts(&seller.id).await?;
    Ok(Json(receipts.into_iter().map(receipt_view).collect()))
}

pub async fn confirm_receipt(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReceiptConfirm>,
) -> Result<Json<ReceiptView>, ServerError> {
    let seller = state.engine.seller_by_user(&user.id).await?;

    let decision = match payload.decision {
        api_types::ReceiptDecision::Received => engine::ReceiptDecision::Received,
        api_types::ReceiptDecision::NotReceived => engine::ReceiptDecision::NotReceived,
    };
    let receipt = state
        .engine
        .confirm_receipt(&seller.id, parse_id(&id)?, decision)
        .await?;
    Ok(Json(receipt_view(receipt)))
}
