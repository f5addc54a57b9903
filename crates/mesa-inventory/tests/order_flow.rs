//! End-to-end order flow tests: concurrent orders racing through the full
//! facade (reservation + gateway confirmation) against one tenant's map.

use std::sync::Arc;

use mesa_core::types::{OrderLine, StockKey};
use mesa_inventory::{InMemoryGateway, InventoryManager, StockGateway};

async fn manager_with(rows: Vec<(StockKey, i64)>) -> (Arc<InventoryManager>, Arc<InMemoryGateway>) {
    let gateway = Arc::new(InMemoryGateway::with_rows(rows));
    let manager = InventoryManager::initialize("cafe-1", Arc::clone(&gateway) as Arc<dyn StockGateway>)
        .await
        .unwrap();
    (Arc::new(manager), gateway)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_orders_never_oversell() {
    let (manager, gateway) = manager_with(vec![(StockKey::base("tart"), 10)]).await;

    // 8 concurrent orders of 3 against a total of 10: at most 3 can land.
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move {
                manager
                    .process_order(&[OrderLine::new("tart", None, 3)])
                    .await
                    .is_ok()
            })
        })
        .collect();

    let mut successes = 0;
    for task in tasks {
        if task.await.unwrap() {
            successes += 1;
        }
    }

    assert!(successes <= 3, "sold {} x3 from a stock of 10", successes);
    assert!(successes >= 1);

    let remote = gateway.remote_total(&StockKey::base("tart")).await.unwrap();
    assert_eq!(remote, 10 - successes * 3);

    let record = manager.get_product_stock("tart", None).unwrap();
    assert_eq!(record.total_stock, remote);
    assert_eq!(record.ordered_quantity, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn two_racing_orders_exactly_one_wins() {
    let (manager, _) = manager_with(vec![(StockKey::base("tart"), 5)]).await;

    let a = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move {
            manager
                .process_order(&[OrderLine::new("tart", None, 4)])
                .await
        })
    };
    let b = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move {
            manager
                .process_order(&[OrderLine::new("tart", None, 4)])
                .await
        })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);

    let loser = results.iter().find(|r| r.is_err()).unwrap();
    assert!(loser.as_ref().unwrap_err().is_insufficient_stock());

    // Winner confirmed: total 1, no outstanding reservation.
    let record = manager.get_product_stock("tart", None).unwrap();
    assert_eq!(record.total_stock, 1);
    assert_eq!(record.ordered_quantity, 0);
}

#[tokio::test]
async fn multi_line_order_spanning_variants() {
    let (manager, gateway) = manager_with(vec![
        (StockKey::base("espresso"), 10),
        (StockKey::variant("latte", "oat"), 3),
    ])
    .await;

    manager
        .process_order(&[
            OrderLine::new("espresso", None, 2),
            OrderLine::new("latte", Some("oat".to_string()), 1),
        ])
        .await
        .unwrap();

    assert_eq!(gateway.remote_total(&StockKey::base("espresso")).await, Some(8));
    assert_eq!(
        gateway.remote_total(&StockKey::variant("latte", "oat")).await,
        Some(2)
    );
}

#[tokio::test]
async fn unconfirmed_reservation_survives_until_retry_succeeds() {
    let (manager, gateway) = manager_with(vec![(StockKey::base("tart"), 5)]).await;
    let lines = vec![OrderLine::new("tart", None, 2)];

    gateway.set_offline(true).await;
    let err = manager.process_order(&lines).await.unwrap_err();
    assert!(err.is_retryable());

    // Availability stays reduced while unconfirmed. Submitting the order
    // again would re-reserve on top of the kept intent, so release first.
    assert!(!manager.is_available("tart", None, 4));
    manager.release_order(&lines);

    gateway.set_offline(false).await;
    manager.process_order(&lines).await.unwrap();

    let record = manager.get_product_stock("tart", None).unwrap();
    assert_eq!(record.total_stock, 3);
    assert_eq!(record.ordered_quantity, 0);
}
