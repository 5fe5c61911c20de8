use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{attendance, distribution, ledger, notifications, operations, requests, staff};
use engine::{Engine, users};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// Request-time "today": business dates default to the server clock.
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<users::Model> = users::Entity::find()
        .filter(users::Column::Username.eq(auth_header.username()))
        .filter(users::Column::Password.eq(auth_header.password()))
        .filter(users::Column::Active.eq(true))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/managers", post(staff::create_manager).get(staff::list_managers))
        .route(
            "/managers/{id}",
            axum::routing::delete(staff::remove_manager),
        )
        .route("/employees", post(staff::create_employee).get(staff::list_employees))
        .route("/locations", post(staff::create_location).get(staff::list_locations))
        .route("/sellers", post(staff::create_seller).get(staff::list_sellers))
        .route("/attendance", post(attendance::mark))
        .route("/attendance/summary", get(attendance::monthly_summary))
        .route("/deductions", post(attendance::create_deduction))
        .route("/dashboard", get(attendance::employee_dashboard))
        .route("/feed", post(operations::record_feed))
        .route("/expenses", post(operations::record_expense))
        .route("/medicine", post(operations::record_medicine))
        .route("/leftover", post(operations::update_leftover))
        .route("/daily", get(operations::daily_report))
        .route("/distributions", post(distribution::distribute))
        .route(
            "/distributions/pending",
            get(distribution::manager_pending),
        )
        .route("/receipts/pending", get(distribution::pending_receipts))
        .route("/receipts/{id}/confirm", post(distribution::confirm_receipt))
        .route("/sales", post(ledger::record_sale))
        .route("/dailyTotals", post(ledger::record_daily_totals))
        .route("/summary", get(ledger::seller_summary))
        .route("/requests", post(requests::create).get(requests::outgoing))
        .route("/requests/incoming", get(requests::incoming))
        .route("/requests/{id}/accept", post(requests::accept))
        .route("/requests/{id}/received", post(requests::mark_received))
        .route("/requests/{id}/reject", post(requests::reject))
        .route("/borrowLend", get(requests::history))
        .route("/notifications", get(notifications::list))
        .route(
            "/notifications/{id}/read",
            post(notifications::mark_read),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
