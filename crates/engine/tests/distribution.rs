use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::Database;

use engine::{Engine, EngineError, MilkSource, ReceiptDecision, ReceiptStatus};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

struct Yard {
    manager_id: String,
    location_id: String,
    seller_ids: Vec<String>,
    seller_user_ids: Vec<String>,
}

async fn seed_yard(engine: &Engine, seller_count: usize) -> Yard {
    let manager = engine
        .create_manager("mario", "password", "Mario")
        .await
        .unwrap();
    let location = engine
        .create_location("Centro", "Via Roma 1")
        .await
        .unwrap();

    let mut seller_ids = Vec::new();
    let mut seller_user_ids = Vec::new();
    for n in 0..seller_count {
        let seller = engine
            .create_seller(
                &location.id,
                &format!("seller{n}"),
                "password",
                &format!("Seller {n}"),
            )
            .await
            .unwrap();
        seller_ids.push(seller.id);
        seller_user_ids.push(seller.user_id);
    }

    Yard {
        manager_id: manager.id,
        location_id: location.id,
        seller_ids,
        seller_user_ids,
    }
}

#[tokio::test]
async fn distribute_splits_evenly_across_active_sellers() {
    let engine = engine_with_db().await;
    let yard = seed_yard(&engine, 4).await;
    let date = d(2026, 3, 10);

    let outcome = engine
        .distribute(&yard.manager_id, &yard.location_id, date, dec!(100))
        .await
        .unwrap();
    assert_eq!(outcome.seller_count, 4);
    assert_eq!(outcome.quantity_per_seller, dec!(25));

    for seller_id in &yard.seller_ids {
        let receipts = engine.list_pending_receipts(seller_id).await.unwrap();
        assert_eq!(receipts.len(), 1);
        let receipt = &receipts[0];
        assert_eq!(receipt.quantity, dec!(25));
        assert_eq!(receipt.date, date);
        assert_eq!(receipt.source, MilkSource::FromFarm);
        assert_eq!(receipt.status, ReceiptStatus::Pending);
        assert_eq!(receipt.manager_id.as_deref(), Some(yard.manager_id.as_str()));
    }

    let report = engine.daily_report(&yard.manager_id, date).await.unwrap();
    let distribution = report.milk_distribution.unwrap();
    assert_eq!(distribution.total_milk, dec!(100));
}

#[tokio::test]
async fn distribute_stores_exact_split_and_rounds_only_the_notification() {
    let engine = engine_with_db().await;
    let yard = seed_yard(&engine, 3).await;
    let date = d(2026, 3, 10);

    let outcome = engine
        .distribute(&yard.manager_id, &yard.location_id, date, dec!(100))
        .await
        .unwrap();
    let exact = dec!(100) / Decimal::from(3u64);
    assert_eq!(outcome.quantity_per_seller, exact);

    // Storage round-trips through the sqlite driver, so compare at a fixed
    // scale instead of full precision.
    let receipts = engine
        .list_pending_receipts(&yard.seller_ids[0])
        .await
        .unwrap();
    assert_eq!(receipts[0].quantity.round_dp(6), dec!(33.333333));

    let inbox = engine
        .list_notifications(&yard.seller_user_ids[0], 20)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].message.contains("33.33L"));
}

#[tokio::test]
async fn distribute_fails_without_active_sellers() {
    let engine = engine_with_db().await;
    let manager = engine
        .create_manager("mario", "password", "Mario")
        .await
        .unwrap();
    let location = engine
        .create_location("Deserto", "Via Vuota 0")
        .await
        .unwrap();

    let err = engine
        .distribute(&manager.id, &location.id, d(2026, 3, 10), dec!(50))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    // Nothing was written: the day has no distribution summary.
    let report = engine.daily_report(&manager.id, d(2026, 3, 10)).await.unwrap();
    assert!(report.milk_distribution.is_none());
}

#[tokio::test]
async fn confirm_receipt_is_one_way() {
    let engine = engine_with_db().await;
    let yard = seed_yard(&engine, 1).await;
    let date = d(2026, 3, 10);

    engine
        .distribute(&yard.manager_id, &yard.location_id, date, dec!(40))
        .await
        .unwrap();
    let receipt_id = engine.list_pending_receipts(&yard.seller_ids[0]).await.unwrap()[0].id;

    let receipt = engine
        .confirm_receipt(&yard.seller_ids[0], receipt_id, ReceiptDecision::Received)
        .await
        .unwrap();
    assert_eq!(receipt.status, ReceiptStatus::Received);

    let err = engine
        .confirm_receipt(&yard.seller_ids[0], receipt_id, ReceiptDecision::NotReceived)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn confirm_receipt_requires_ownership() {
    let engine = engine_with_db().await;
    let yard = seed_yard(&engine, 2).await;
    let date = d(2026, 3, 10);

    engine
        .distribute(&yard.manager_id, &yard.location_id, date, dec!(40))
        .await
        .unwrap();
    let receipt_id = engine.list_pending_receipts(&yard.seller_ids[0]).await.unwrap()[0].id;

    let err = engine
        .confirm_receipt(&yard.seller_ids[1], receipt_id, ReceiptDecision::Received)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn confirmation_notifies_the_manager_either_way() {
    let engine = engine_with_db().await;
    let yard = seed_yard(&engine, 2).await;
    let date = d(2026, 3, 10);

    engine
        .distribute(&yard.manager_id, &yard.location_id, date, dec!(60))
        .await
        .unwrap();
    let manager_user_id = engine.list_managers().await.unwrap()[0].user_id.clone();

    let first = engine.list_pending_receipts(&yard.seller_ids[0]).await.unwrap()[0].id;
    engine
        .confirm_receipt(&yard.seller_ids[0], first, ReceiptDecision::Received)
        .await
        .unwrap();
    let second = engine.list_pending_receipts(&yard.seller_ids[1]).await.unwrap()[0].id;
    engine
        .confirm_receipt(&yard.seller_ids[1], second, ReceiptDecision::NotReceived)
        .await
        .unwrap();

    let inbox = engine.list_notifications(&manager_user_id, 20).await.unwrap();
    assert_eq!(inbox.len(), 2);

    // A denied receipt is excluded going forward but never adjusts the
    // recorded distribution total.
    let report = engine.daily_report(&yard.manager_id, date).await.unwrap();
    assert_eq!(report.milk_distribution.unwrap().total_milk, dec!(60));
}

#[tokio::test]
async fn leftover_updates_only_touch_their_fields() {
    let engine = engine_with_db().await;
    let yard = seed_yard(&engine, 2).await;
    let date = d(2026, 3, 10);

    engine
        .distribute(&yard.manager_id, &yard.location_id, date, dec!(80))
        .await
        .unwrap();
    let updated = engine
        .update_leftover(&yard.manager_id, date, Some(dec!(5.5)), None)
        .await
        .unwrap();
    assert_eq!(updated.leftover_milk, dec!(5.5));
    assert_eq!(updated.leftover_sales, dec!(0));
    assert_eq!(updated.total_milk, dec!(80));
}
