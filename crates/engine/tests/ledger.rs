use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::Database;

use engine::{Engine, EngineError, MilkSource, ReceiptDecision};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

async fn seed_seller(engine: &Engine, location_id: &str, n: usize) -> engine::sellers::Model {
    engine
        .create_seller(
            location_id,
            &format!("seller{n}"),
            "password",
            &format!("Seller {n}"),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn remaining_milk_counts_received_minus_sold_minus_unsettled_lent() {
    let engine = engine_with_db().await;
    let location = engine
        .create_location("Centro", "Via Roma 1")
        .await
        .unwrap();
    let seller = seed_seller(&engine, &location.id, 0).await;
    let borrower = seed_seller(&engine, &location.id, 1).await;

    engine
        .record_milk_received(&seller.id, d(2026, 3, 1), dec!(100), MilkSource::FromFarm)
        .await
        .unwrap();
    engine
        .record_sale(&seller.id, d(2026, 3, 2), dec!(30), "Bar Sport", dec!(45))
        .await
        .unwrap();

    let request = engine.create_request(&borrower.id, dec!(20)).await.unwrap();
    engine
        .accept_request(&seller.id, request.id, d(2026, 3, 3))
        .await
        .unwrap();

    assert_eq!(engine.remaining_milk(&seller.id).await.unwrap(), dec!(50));

    // 60L > 50L remaining: the sale is rejected and nothing is appended.
    let err = engine
        .record_sale(&seller.id, d(2026, 3, 3), dec!(60), "Bar Sport", dec!(90))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientStock {
            available: dec!(50),
            requested: dec!(60),
        }
    );
    assert_eq!(engine.remaining_milk(&seller.id).await.unwrap(), dec!(50));
}

#[tokio::test]
async fn absent_aggregates_read_as_zero() {
    let engine = engine_with_db().await;
    let location = engine
        .create_location("Centro", "Via Roma 1")
        .await
        .unwrap();
    let seller = seed_seller(&engine, &location.id, 0).await;

    assert_eq!(engine.remaining_milk(&seller.id).await.unwrap(), dec!(0));

    let summary = engine
        .seller_daily_summary(&seller.id, d(2026, 3, 1))
        .await
        .unwrap();
    assert_eq!(summary.total_received, dec!(0));
    assert_eq!(summary.farm_milk, dec!(0));
    assert_eq!(summary.inter_seller_milk, dec!(0));
    assert_eq!(summary.total_sold, dec!(0));
    assert_eq!(summary.total_lent, dec!(0));
    assert_eq!(summary.remaining_milk, dec!(0));
    assert_eq!(summary.revenue, dec!(0));
    assert!(summary.sales.is_empty());
}

#[tokio::test]
async fn pending_deliveries_are_not_stock_yet() {
    let engine = engine_with_db().await;
    let manager = engine
        .create_manager("mario", "password", "Mario")
        .await
        .unwrap();
    let location = engine
        .create_location("Centro", "Via Roma 1")
        .await
        .unwrap();
    let seller = seed_seller(&engine, &location.id, 0).await;
    let date = d(2026, 3, 5);

    engine
        .distribute(&manager.id, &location.id, date, dec!(40))
        .await
        .unwrap();

    // The dashboard shows the inbound milk, but it cannot be sold until
    // the seller confirms receipt.
    let summary = engine.seller_daily_summary(&seller.id, date).await.unwrap();
    assert_eq!(summary.total_received, dec!(40));
    assert_eq!(summary.farm_milk, dec!(40));
    assert_eq!(summary.remaining_milk, dec!(0));

    let err = engine
        .record_sale(&seller.id, date, dec!(10), "Bar Sport", dec!(15))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientStock { .. }));

    let receipt_id = engine.list_pending_receipts(&seller.id).await.unwrap()[0].id;
    engine
        .confirm_receipt(&seller.id, receipt_id, ReceiptDecision::Received)
        .await
        .unwrap();
    assert_eq!(engine.remaining_milk(&seller.id).await.unwrap(), dec!(40));
}

#[tokio::test]
async fn daily_totals_upsert_is_wholesale() {
    let engine = engine_with_db().await;
    let location = engine
        .create_location("Centro", "Via Roma 1")
        .await
        .unwrap();
    let seller = seed_seller(&engine, &location.id, 0).await;
    let date = d(2026, 3, 5);

    let first = engine
        .record_daily_totals(&seller.id, date, dec!(120), dec!(80))
        .await
        .unwrap();
    assert_eq!(first.revenue, dec!(200));

    let second = engine
        .record_daily_totals(&seller.id, date, dec!(150), dec!(10))
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.revenue, dec!(160));
    assert_eq!(second.cash_sales, dec!(150));
    assert_eq!(second.online_sales, dec!(10));

    let summary = engine.seller_daily_summary(&seller.id, date).await.unwrap();
    assert_eq!(summary.revenue, dec!(160));
    assert_eq!(summary.cash_sales, dec!(150));
    assert_eq!(summary.online_sales, dec!(10));
}

#[tokio::test]
async fn daily_summary_splits_inbound_by_source() {
    let engine = engine_with_db().await;
    let location = engine
        .create_location("Centro", "Via Roma 1")
        .await
        .unwrap();
    let seller = seed_seller(&engine, &location.id, 0).await;
    let date = d(2026, 3, 5);

    engine
        .record_milk_received(&seller.id, date, dec!(60), MilkSource::FromFarm)
        .await
        .unwrap();
    engine
        .record_milk_received(&seller.id, date, dec!(15), MilkSource::InterSeller)
        .await
        .unwrap();
    engine
        .record_sale(&seller.id, date, dec!(25), "Bar Sport", dec!(40))
        .await
        .unwrap();

    let summary = engine.seller_daily_summary(&seller.id, date).await.unwrap();
    assert_eq!(summary.total_received, dec!(75));
    assert_eq!(summary.farm_milk, dec!(60));
    assert_eq!(summary.inter_seller_milk, dec!(15));
    assert_eq!(summary.total_sold, dec!(25));
    assert_eq!(summary.remaining_milk, dec!(50));
    assert_eq!(summary.sales.len(), 1);
}

#[tokio::test]
async fn location_statistics_cover_each_location() {
    let engine = engine_with_db().await;
    let centro = engine
        .create_location("Centro", "Via Roma 1")
        .await
        .unwrap();
    let porto = engine
        .create_location("Porto", "Molo 2")
        .await
        .unwrap();
    let seller_a = seed_seller(&engine, &centro.id, 0).await;
    let _seller_b = seed_seller(&engine, &porto.id, 1).await;
    let date = d(2026, 3, 5);

    engine
        .record_milk_received(&seller_a.id, date, dec!(35), MilkSource::FromFarm)
        .await
        .unwrap();

    let stats = engine.location_statistics(date).await.unwrap();
    assert_eq!(stats.len(), 2);
    let centro_stats = stats
        .iter()
        .find(|entry| entry.location_id == centro.id)
        .unwrap();
    assert_eq!(centro_stats.seller_count, 1);
    assert_eq!(centro_stats.milk_received_today, dec!(35));
    assert_eq!(centro_stats.farm_milk_today, dec!(35));
    let porto_stats = stats
        .iter()
        .find(|entry| entry.location_id == porto.id)
        .unwrap();
    assert_eq!(porto_stats.milk_received_today, dec!(0));
}

#[tokio::test]
async fn duplicate_usernames_violate_integrity() {
    let engine = engine_with_db().await;
    engine
        .create_manager("mario", "password", "Mario")
        .await
        .unwrap();

    let err = engine
        .create_manager("mario", "password", "L'altro Mario")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Integrity(_)));
}

#[tokio::test]
async fn deactivated_managers_drop_out_of_the_listing() {
    let engine = engine_with_db().await;
    let first = engine
        .create_manager("mario", "password", "Mario")
        .await
        .unwrap();
    let second = engine
        .create_manager("luigi", "password", "Luigi")
        .await
        .unwrap();

    engine.deactivate_manager(&first.id).await.unwrap();

    let managers = engine.list_managers().await.unwrap();
    assert_eq!(managers.len(), 1);
    assert_eq!(managers[0].id, second.id);

    let err = engine.deactivate_manager("manager999").await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn sequence_ids_are_dense_and_human_readable() {
    let engine = engine_with_db().await;
    let first = engine
        .create_manager("mario", "password", "Mario")
        .await
        .unwrap();
    let second = engine
        .create_manager("luigi", "password", "Luigi")
        .await
        .unwrap();
    assert_eq!(first.id, "manager001");
    assert_eq!(second.id, "manager002");

    let employee = engine
        .create_employee(&first.id, "anna", "password", "Anna", dec!(500))
        .await
        .unwrap();
    assert_eq!(employee.id, "EMP001");
}
