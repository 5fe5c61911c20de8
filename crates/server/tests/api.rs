use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use chrono::Utc;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use migration::MigratorTrait;
use server::{ServerState, router};

async fn app_with_admin() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    engine::users::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        username: Set("admin".to_string()),
        password: Set("password".to_string()),
        role: Set(engine::Role::Admin.as_str().to_string()),
        active: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .unwrap();

    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    router(ServerState {
        engine: Arc::new(engine),
        db,
    })
}

fn as_decimal(value: &Value) -> rust_decimal::Decimal {
    value.as_str().unwrap().parse().unwrap()
}

fn basic(username: &str, password: &str) -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

async fn call(app: &Router, method: &str, uri: &str, user: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic(user, "password"));
    let request = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            builder.body(Body::from(value.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let app = app_with_admin().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/notifications")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn manager_listing_is_admin_only() {
    let app = app_with_admin().await;

    let (status, manager) = call(
        &app,
        "POST",
        "/managers",
        "admin",
        Some(json!({"username": "mario", "password": "password", "name": "Mario"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(manager["manager_id"], "manager001");

    let (status, _) = call(&app, "GET", "/managers", "mario", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn distribution_flow_over_http() {
    let app = app_with_admin().await;

    let (_, _manager) = call(
        &app,
        "POST",
        "/managers",
        "admin",
        Some(json!({"username": "mario", "password": "password", "name": "Mario"})),
    )
    .await;

    let (status, location) = call(
        &app,
        "POST",
        "/locations",
        "mario",
        Some(json!({"name": "Centro", "address": "Via Roma 1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let location_id = location["location_id"].as_str().unwrap().to_string();

    let (status, _seller) = call(
        &app,
        "POST",
        "/sellers",
        "mario",
        Some(json!({
            "location_id": location_id,
            "username": "anna",
            "password": "password",
            "name": "Anna",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, outcome) = call(
        &app,
        "POST",
        "/distributions",
        "mario",
        Some(json!({"location_id": location_id, "quantity": "40"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["seller_count"], 1);
    assert_eq!(as_decimal(&outcome["quantity_per_seller"]), dec!(40));

    // The seller sees the pending delivery and a notification about it.
    let (status, pending) = call(&app, "GET", "/receipts/pending", "anna", None).await;
    assert_eq!(status, StatusCode::OK);
    let receipt_id = pending[0]["receipt_id"].as_str().unwrap().to_string();
    assert_eq!(pending[0]["status"], "pending");

    let (_, inbox) = call(&app, "GET", "/notifications", "anna", None).await;
    assert_eq!(inbox.as_array().unwrap().len(), 1);

    let (status, confirmed) = call(
        &app,
        "POST",
        &format!("/receipts/{receipt_id}/confirm"),
        "anna",
        Some(json!({"decision": "received"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "received");

    let (status, _sale) = call(
        &app,
        "POST",
        "/sales",
        "anna",
        Some(json!({"quantity": "15", "customer_name": "Bar Sport", "total_amount": "22.50"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Overselling the remaining 25L conflicts.
    let (status, error) = call(
        &app,
        "POST",
        "/sales",
        "anna",
        Some(json!({"quantity": "60", "customer_name": "Bar Sport", "total_amount": "90"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error["error"].as_str().unwrap().contains("Insufficient"));

    let (status, summary) = call(&app, "GET", "/summary", "anna", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_decimal(&summary["remaining_milk"]), dec!(25));
    assert_eq!(as_decimal(&summary["farm_milk"]), dec!(40));
}
