use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::Database;

use engine::{
    BorrowDirection, Engine, EngineError, MilkSource, ReceiptStatus, RequestStatus,
};
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

/// Three sellers at one location; seller 1 and 2 hold confirmed stock.
async fn seed_market(engine: &Engine) -> Vec<engine::sellers::Model> {
    let location = engine
        .create_location("Centro", "Via Roma 1")
        .await
        .unwrap();
    let mut sellers = Vec::new();
    for n in 0..3 {
        sellers.push(seed_seller(engine, &location.id, n).await);
    }
    for seller in &sellers[1..] {
        engine
            .record_milk_received(&seller.id, d(2026, 3, 1), dec!(100), MilkSource::FromFarm)
            .await
            .unwrap();
    }
    sellers
}

#[tokio::test]
async fn request_lifecycle_settles_on_borrow_date() {
    let engine = engine_with_db().await;
    let sellers = seed_market(&engine).await;
    let borrow_date = d(2026, 3, 2);

    let request = engine.create_request(&sellers[0].id, dec!(30)).await.unwrap();
    assert_eq!(request.status, RequestStatus::Pending);

    // Request creation fans out to every other active seller.
    for seller in &sellers[1..] {
        let inbox = engine.list_notifications(&seller.user_id, 20).await.unwrap();
        assert_eq!(inbox.len(), 1);
    }

    let obligation = engine
        .accept_request(&sellers[1].id, request.id, borrow_date)
        .await
        .unwrap();
    assert_eq!(obligation.borrower_seller_id, sellers[0].id);
    assert_eq!(obligation.lender_seller_id, sellers[1].id);
    assert_eq!(obligation.borrow_date, borrow_date);
    assert!(!obligation.settled);

    let outgoing = engine.list_outgoing_requests(&sellers[0].id).await.unwrap();
    assert_eq!(outgoing[0].status, RequestStatus::OnHold);
    assert_eq!(outgoing[0].to_seller_id.as_deref(), Some(sellers[1].id.as_str()));

    // The lender's stock is committed while the obligation is open.
    assert_eq!(engine.remaining_milk(&sellers[1].id).await.unwrap(), dec!(70));

    // Confirmation happens days later, but the ledger receipt is dated to
    // the day the transfer was agreed.
    let receipt = engine
        .mark_received(&sellers[0].id, request.id)
        .await
        .unwrap();
    assert_eq!(receipt.date, borrow_date);
    assert_eq!(receipt.source, MilkSource::InterSeller);
    assert_eq!(receipt.status, ReceiptStatus::Received);
    assert_eq!(receipt.quantity, dec!(30));

    let history = engine.borrow_lend_history(&sellers[0].id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].direction, BorrowDirection::Borrowed);
    assert_eq!(history[0].counterparty, sellers[1].name);
    assert!(history[0].settled);

    // Borrower's stock now includes the transferred milk.
    assert_eq!(engine.remaining_milk(&sellers[0].id).await.unwrap(), dec!(30));

    // Lender was told settlement completed (request fan-out + settlement).
    let lender_inbox = engine
        .list_notifications(&sellers[1].user_id, 20)
        .await
        .unwrap();
    assert_eq!(lender_inbox.len(), 2);
}

#[tokio::test]
async fn acceptance_requires_stock() {
    let engine = engine_with_db().await;
    let location = engine
        .create_location("Centro", "Via Roma 1")
        .await
        .unwrap();
    let requester = seed_seller(&engine, &location.id, 0).await;
    let lender = seed_seller(&engine, &location.id, 1).await;
    engine
        .record_milk_received(&lender.id, d(2026, 3, 1), dec!(10), MilkSource::FromFarm)
        .await
        .unwrap();

    let request = engine.create_request(&requester.id, dec!(30)).await.unwrap();
    let err = engine
        .accept_request(&lender.id, request.id, d(2026, 3, 2))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientStock {
            available: dec!(10),
            requested: dec!(30),
        }
    );

    // Nothing happened: the request is still pending and no obligation
    // exists.
    let incoming = engine.list_incoming_requests(&lender.id).await.unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].status, RequestStatus::Pending);
    assert!(engine
        .borrow_lend_history(&lender.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn second_acceptance_loses() {
    let engine = engine_with_db().await;
    let sellers = seed_market(&engine).await;

    let request = engine.create_request(&sellers[0].id, dec!(20)).await.unwrap();
    engine
        .accept_request(&sellers[1].id, request.id, d(2026, 3, 2))
        .await
        .unwrap();

    let err = engine
        .accept_request(&sellers[2].id, request.id, d(2026, 3, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    // Exactly one obligation exists, owned by the first acceptor.
    assert_eq!(
        engine.borrow_lend_history(&sellers[1].id).await.unwrap().len(),
        1
    );
    assert!(engine
        .borrow_lend_history(&sellers[2].id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn concurrent_acceptances_pick_exactly_one_winner() {
    let engine = engine_with_db().await;
    let sellers = seed_market(&engine).await;

    let request = engine.create_request(&sellers[0].id, dec!(20)).await.unwrap();
    let (first, second) = tokio::join!(
        engine.accept_request(&sellers[1].id, request.id, d(2026, 3, 2)),
        engine.accept_request(&sellers[2].id, request.id, d(2026, 3, 2)),
    );
    assert!(
        first.is_ok() != second.is_ok(),
        "exactly one acceptance must win: {first:?} / {second:?}"
    );

    let outgoing = engine.list_outgoing_requests(&sellers[0].id).await.unwrap();
    assert_eq!(outgoing[0].status, RequestStatus::OnHold);

    let obligations = engine.borrow_lend_history(&sellers[0].id).await.unwrap();
    assert_eq!(obligations.len(), 1);
}

#[tokio::test]
async fn own_request_cannot_be_accepted() {
    let engine = engine_with_db().await;
    let sellers = seed_market(&engine).await;
    engine
        .record_milk_received(&sellers[0].id, d(2026, 3, 1), dec!(50), MilkSource::FromFarm)
        .await
        .unwrap();

    let request = engine.create_request(&sellers[0].id, dec!(10)).await.unwrap();
    let err = engine
        .accept_request(&sellers[0].id, request.id, d(2026, 3, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn requester_can_withdraw_while_pending() {
    let engine = engine_with_db().await;
    let sellers = seed_market(&engine).await;

    let request = engine.create_request(&sellers[0].id, dec!(15)).await.unwrap();
    let rejected = engine
        .reject_request(&sellers[0].id, request.id)
        .await
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);

    // A withdrawn request is gone for acceptors.
    let err = engine
        .accept_request(&sellers[1].id, request.id, d(2026, 3, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    // And cannot be withdrawn twice.
    let err = engine
        .reject_request(&sellers[0].id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn mark_received_requires_the_requester() {
    let engine = engine_with_db().await;
    let sellers = seed_market(&engine).await;

    let request = engine.create_request(&sellers[0].id, dec!(20)).await.unwrap();
    engine
        .accept_request(&sellers[1].id, request.id, d(2026, 3, 2))
        .await
        .unwrap();

    // The lender cannot settle on the borrower's behalf.
    let err = engine
        .mark_received(&sellers[1].id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    // Settling twice fails once the request left `on_hold`.
    engine.mark_received(&sellers[0].id, request.id).await.unwrap();
    let err = engine
        .mark_received(&sellers[0].id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
