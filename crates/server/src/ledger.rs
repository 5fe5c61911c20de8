//! Seller ledger endpoints: sales, daily totals, day summary.

use api_types::milk::{DailyTotalsNew, DailyTotalsView, SaleNew, SaleView, SellerSummaryView};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{ServerError, server::ServerState};
use engine::users;

fn sale_view(model: engine::sales::Model) -> SaleView {
    SaleView {
        sale_id: model.id,
        date: model.date,
        quantity: model.quantity,
        customer_name: model.customer_name,
        total_amount: model.total_amount,
    }
}

pub async fn record_sale(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SaleNew>,
) -> Result<Json<SaleView>, ServerError> {
    let seller = state.engine.seller_by_user(&user.id).await?;
    let sale = state
        .engine
        .record_sale(
            &seller.id,
            payload.date.unwrap_or_else(crate::server::today),
            payload.quantity,
            &payload.customer_name,
            payload.total_amount,
        )
        .await?;
    Ok(Json(sale_view(sale)))
}

pub async fn record_daily_totals(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DailyTotalsNew>,
) -> Result<Json<DailyTotalsView>, ServerError> {
    let seller = state.engine.seller_by_user(&user.id).await?;
    let totals = state
        .engine
        .record_daily_totals(
            &seller.id,
            payload.date.unwrap_or_else(crate::server::today),
            payload.cash_sales,
            payload.online_sales,
        )
        .await?;
    Ok(Json(DailyTotalsView {
        date: totals.date,
        revenue: totals.revenue,
        cash_sales: totals.cash_sales,
        online_sales: totals.online_sales,
    }))
}

#[derive(Deserialize)]
pub struct DateQuery {
    date: Option<chrono::NaiveDate>,
}

pub async fn seller_summary(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<SellerSummaryView>, ServerError> {
    let seller = state.engine.seller_by_user(&user.id).await?;
    let date = query.date.unwrap_or_else(crate::server::today);
    let summary = state.engine.seller_daily_summary(&seller.id, date).await?;

    Ok(Json(SellerSummaryView {
        date: summary.date,
        total_received: summary.total_received,
        farm_milk: summary.farm_milk,
        inter_seller_milk: summary.inter_seller_milk,
        total_sold: summary.total_sold,
        total_lent: summary.total_lent,
        remaining_milk: summary.remaining_milk,
        revenue: summary.revenue,
        cash_sales: summary.cash_sales,
        online_sales: summary.online_sales,
        sales: summary.sales.into_iter().map(sale_view).collect(),
    }))
}
