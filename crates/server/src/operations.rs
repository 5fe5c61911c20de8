//! Daily operations endpoints: feed, expenses, medicine, leftovers and the
//! day report.

use api_types::operations::{
    DailyReportView, DistributionSummaryView, ExpenseNew, ExpenseView, FeedNew, FeedView,
    LeftoverUpdate, MedicineNew, MedicineView,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::users;

fn parse_record_id(value: Option<String>) -> Result<Option<Uuid>, ServerError> {
    value
        .map(|raw| {
            Uuid::parse_str(&raw).map_err(|_| ServerError::Generic("invalid record id".to_string()))
        })
        .transpose()
}

fn feed_view(model: engine::feed_records::Model) -> FeedView {
    FeedView {
        feed_id: model.id,
        date: model.date,
        feed_type: model.feed_type,
        quantity: model.quantity,
        cost: model.cost,
    }
}

fn expense_view(model: engine::expense_records::Model) -> ExpenseView {
    ExpenseView {
        expense_id: model.id,
        date: model.date,
        category: model.category,
        amount: model.amount,
    }
}

fn medicine_view(model: engine::medicine_records::Model) -> MedicineView {
    MedicineView {
        medicine_id: model.id,
        date: model.date,
        medicine_name: model.medicine_name,
        cost: model.cost,
    }
}

fn summary_view(model: engine::milk_distribution::Model) -> DistributionSummaryView {
    DistributionSummaryView {
        date: model.date,
        total_milk: model.total_milk,
        leftover_milk: model.leftover_milk,
        leftover_sales: model.leftover_sales,
    }
}

pub async fn record_feed(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<FeedNew>,
) -> Result<Json<FeedView>, ServerError> {
    let manager = state.engine.manager_by_user(&user.id).await?;
    let record = state
        .engine
        .record_feed(
            &manager.id,
            payload.date.unwrap_or_else(crate::server::today),
            parse_record_id(payload.record_id)?,
            &payload.feed_type,
            payload.quantity,
            payload.cost,
        )
        .await?;
    Ok(Json(feed_view(record)))
}

pub async fn record_expense(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<Json<ExpenseView>, ServerError> {
    let manager = state.engine.manager_by_user(&user.id).await?;
    let record = state
        .engine
        .record_expense(
            &manager.id,
            payload.date.unwrap_or_else(crate::server::today),
            parse_record_id(payload.record_id)?,
            &payload.category,
            payload.amount,
        )
        .await?;
    Ok(Json(expense_view(record)))
}

pub async fn record_medicine(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<MedicineNew>,
) -> Result<Json<MedicineView>, ServerError> {
    let manager = state.engine.manager_by_user(&user.id).await?;
    let record = state
        .engine
        .record_medicine(
            &manager.id,
            payload.date.unwrap_or_else(crate::server::today),
            parse_record_id(payload.record_id)?,
            &payload.medicine_name,
            payload.cost,
        )
        .await?;
    Ok(Json(medicine_view(record)))
}

pub async fn update_leftover(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<LeftoverUpdate>,
) -> Result<Json<DistributionSummaryView>, ServerError> {
    let manager = state.engine.manager_by_user(&user.id).await?;
    let summary = state
        .engine
        .update_leftover(
            &manager.id,
            payload.date.unwrap_or_else(crate::server::today),
            payload.leftover_milk,
            payload.leftover_sales,
        )
        .await?;
    Ok(Json(summary_view(summary)))
}

#[derive(Deserialize)]
pub struct DateQuery {
    date: Option<chrono::NaiveDate>,
}

pub async fn daily_report(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailyReportView>, ServerError> {
    let manager = state.engine.manager_by_user(&user.id).await?;
    let date = query.date.unwrap_or_else(crate::server::today);
    let report = state.engine.daily_report(&manager.id, date).await?;

    Ok(Json(DailyReportView {
        date: report.record.date,
        feed_records: report.feed_records.into_iter().map(feed_view).collect(),
        expense_records: report
            .expense_records
            .into_iter()
            .map(expense_view)
            .collect(),
        medicine_records: report
            .medicine_records
            .into_iter()
            .map(medicine_view)
            .collect(),
        milk_distribution: report.milk_distribution.map(summary_view),
    }))
}
