//! Inter-seller milk request endpoints.

use api_types::request::{BorrowLendView, RequestNew, RequestView};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{BorrowDirection, users};

fn request_view(request: engine::MilkRequest) -> RequestView {
    RequestView {
        request_id: request.id.to_string(),
        from_seller_id: request.from_seller_id,
        to_seller_id: request.to_seller_id,
        quantity: request.quantity,
        status: request.status.as_str().to_string(),
    }
}

fn parse_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw).map_err(|_| ServerError::Generic("invalid id".to_string()))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RequestNew>,
) -> Result<Json<RequestView>, ServerError> {
    let seller = state.engine.seller_by_user(&user.id).await?;
    let request = state
        .engine
        .create_request(&seller.id, payload.quantity)
        .await?;
    Ok(Json(request_view(request)))
}

pub async fn incoming(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<RequestView>>, ServerError> {
    let seller = state.engine.seller_by_user(&user.id).await?;
    let requests = state.engine.list_incoming_requests(&seller.id).await?;
    Ok(Json(requests.into_iter().map(request_view).collect()))
}

pub async fn outgoing(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<RequestView>>, ServerError> {
    let seller = state.engine.seller_by_user(&user.id).await?;
    let requests = state.engine.list_outgoing_requests(&seller.id).await?;
    Ok(Json(requests.into_iter().map(request_view).collect()))
}

pub async fn accept(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<api_types::request::BorrowLendView>, ServerError> {
    let seller = state.engine.seller_by_user(&user.id).await?;
    let record = state
        .engine
        .accept_request(&seller.id, parse_id(&id)?, crate::server::today())
        .await?;
    Ok(Json(BorrowLendView {
        date: record.borrow_date,
        direction: "lent".to_string(),
        counterparty: record.borrower_seller_id,
        quantity: record.quantity,
        settled: record.settled,
    }))
}

pub async fn mark_received(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<api_types::milk::ReceiptView>, ServerError> {
    let seller = state.engine.seller_by_user(&user.id).await?;
    let receipt = state
        .engine
        .mark_received(&seller.id, parse_id(&id)?)
        .await?;
    Ok(Json(api_types::milk::ReceiptView {
        receipt_id: receipt.id.to_string(),
        quantity: receipt.quantity,
        date: receipt.date,
        source: receipt.source.as_str().to_string(),
        status: receipt.status.as_str().to_string(),
        manager_id: receipt.manager_id,
    }))
}

pub async fn reject(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<RequestView>, ServerError> {
    let seller = state.engine.seller_by_user(&user.id).await?;
    let request = state.engine.reject_request(&seller.id, parse_id(&id)?).await?;
    Ok(Json(request_view(request)))
}

pub async fn history(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BorrowLendView>>, ServerError> {
    let seller = state.engine.seller_by_user(&user.id).await?;
    let entries = state.engine.borrow_lend_history(&seller.id).await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|entry| BorrowLendView {
                date: entry.date,
                direction: match entry.direction {
                    BorrowDirection::Borrowed => "borrowed".to_string(),
                    BorrowDirection::Lent => "lent".to_string(),
                },
                counterparty: entry.counterparty,
                quantity: entry.quantity,
                settled: entry.settled,
            })
            .collect(),
    ))
}
