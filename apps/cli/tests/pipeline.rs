//! End-to-end tests: order pipeline against an in-memory database and
//! file-backed auxiliary sinks in a temp directory.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use bistro_cli::{AppConfig, AppState, MenuBackend, OrderError, OrderPipeline};
use bistro_core::{DiscountRate, MenuItem, Money, OrderLine, OrderType, PaymentMethod, TaxRate};
use bistro_db::{Database, DbConfig, DbError, MenuStore, OrderStore};
use bistro_ledger::{AuxiliarySink, BillArchive, BillRecord, LedgerError, LedgerResult, SalesLedger};

async fn open_state(dir: &Path, backend: MenuBackend) -> AppState {
    let mut config = AppConfig::with_data_dir(dir);
    config.menu.backend = backend;
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    AppState::with_database(config, db).await.unwrap()
}

fn line(name: &str, unit_price_cents: i64, quantity: i64) -> OrderLine {
    OrderLine {
        item_name: name.to_string(),
        unit_price_cents,
        quantity,
    }
}

fn dosa_and_naan() -> Vec<OrderLine> {
    vec![line("Masala Dosa", 8000, 2), line("Butter Naan", 3000, 1)]
}

struct FailingSink;

#[async_trait]
impl AuxiliarySink for FailingSink {
    fn name(&self) -> &'static str {
        "always_fails"
    }

    async fn append(&self, _record: &BillRecord) -> LedgerResult<()> {
        Err(LedgerError::io(
            Path::new("/dev/full"),
            std::io::Error::other("disk full"),
        ))
    }
}

#[tokio::test]
async fn empty_order_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(dir.path(), MenuBackend::Sqlite).await;

    let result = state
        .pipeline
        .place_order(&[], OrderType::Takeaway, PaymentMethod::Cash, None, DiscountRate::none())
        .await;

    assert!(matches!(result, Err(OrderError::EmptyOrder)));
    assert_eq!(state.orders().count_orders().await.unwrap(), 0);
    assert_eq!(state.orders().count_lines().await.unwrap(), 0);
    assert!(!state.config.bill_archive_path().exists());
    assert!(!state.config.sales_ledger_path().exists());
}

#[tokio::test]
async fn dine_in_without_valid_table_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(dir.path(), MenuBackend::Sqlite).await;

    for table in [None, Some(0), Some(-4)] {
        let result = state
            .pipeline
            .place_order(&dosa_and_naan(), OrderType::DineIn, PaymentMethod::Card, table, DiscountRate::none())
            .await;
        assert!(
            matches!(result, Err(OrderError::InvalidTable { .. })),
            "table {:?} should be rejected",
            table
        );
    }

    assert_eq!(state.orders().count_orders().await.unwrap(), 0);
    assert!(!state.config.bill_archive_path().exists());
    assert!(!state.config.receipts_dir().exists());
}

#[tokio::test]
async fn bad_quantity_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(dir.path(), MenuBackend::Sqlite).await;

    let lines = vec![line("Idli", 4000, 1), line("Veg Thali", 15000, 0)];
    let result = state
        .pipeline
        .place_order(&lines, OrderType::Takeaway, PaymentMethod::Cash, None, DiscountRate::none())
        .await;

    assert!(matches!(result, Err(OrderError::Invalid(_))));
    assert_eq!(state.orders().count_orders().await.unwrap(), 0);
}

fn gold_thali() -> MenuItem {
    MenuItem::new("Gold Thali", "Meals", Money::parse("10000000000000000").unwrap())
}

#[tokio::test]
async fn price_above_maximum_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(dir.path(), MenuBackend::Sqlite).await;

    let lines = vec![OrderLine::from_menu_item(&gold_thali(), 10)];
    let result = state
        .pipeline
        .place_order(&lines, OrderType::Takeaway, PaymentMethod::Cash, None, DiscountRate::none())
        .await;

    assert!(matches!(result, Err(OrderError::Invalid(_))));
    assert_eq!(state.orders().count_orders().await.unwrap(), 0);
    assert!(!state.config.bill_archive_path().exists());
}

#[tokio::test]
async fn menu_rejects_price_above_maximum_on_both_backends() {
    for backend in [MenuBackend::Sqlite, MenuBackend::Csv] {
        let dir = tempfile::tempdir().unwrap();
        let state = open_state(dir.path(), backend).await;

        let result = state.menu.upsert(&gold_thali()).await;
        assert!(matches!(result, Err(DbError::Invalid(_))), "{:?}", backend);
        assert!(state.menu.find_by_name("Gold Thali").await.unwrap().is_none());
    }
}

#[tokio::test]
async fn discount_above_full_price_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(dir.path(), MenuBackend::Sqlite).await;

    let result = state
        .pipeline
        .place_order(&dosa_and_naan(), OrderType::Takeaway, PaymentMethod::Cash, None, DiscountRate::from_bps(15_000))
        .await;

    assert!(matches!(result, Err(OrderError::Invalid(_))));
    assert_eq!(state.orders().count_orders().await.unwrap(), 0);
    assert!(!state.config.sales_ledger_path().exists());

    // 100% off still leaves the tax to pay
    let placed = state
        .pipeline
        .place_order(&dosa_and_naan(), OrderType::Takeaway, PaymentMethod::Cash, None, DiscountRate::from_bps(10_000))
        .await
        .unwrap();
    assert_eq!(placed.order.subtotal_cents, 19000);
    assert_eq!(placed.order.discount_cents, 19000);
    assert_eq!(placed.order.total_cents, 950);
}

#[tokio::test]
async fn committed_order_has_every_line_and_bill() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(dir.path(), MenuBackend::Sqlite).await;

    let placed = state
        .pipeline
        .place_order(
            &dosa_and_naan(),
            OrderType::DineIn,
            PaymentMethod::Cash,
            Some(3),
            DiscountRate::from_bps(1000),
        )
        .await
        .unwrap();

    assert!(placed.fully_recorded());
    assert_eq!(placed.order.table_number, Some(3));
    assert_eq!(placed.order.subtotal_cents, 19000);
    assert_eq!(placed.order.tax_cents, 950);
    assert_eq!(placed.order.discount_cents, 1900);
    assert_eq!(placed.order.total_cents, 18050);

    let orders = state.orders();
    assert_eq!(orders.count_lines().await.unwrap(), 2);
    assert_eq!(orders.get_lines(placed.order.id).await.unwrap(), dosa_and_naan());
    assert_eq!(orders.get_order(placed.order.id).await.unwrap(), Some(placed.order.clone()));

    let receipt = std::fs::read_to_string(
        state.config.receipts_dir().join(format!("receipt_{}.txt", placed.order.id)),
    )
    .unwrap();
    assert!(receipt.contains("TOTAL: ₹180.50"));

    let ledger = SalesLedger::new(state.config.sales_ledger_path());
    let entries = ledger.read_entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, "180.50");
}

#[tokio::test]
async fn ids_increase_and_archive_keeps_every_order() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(dir.path(), MenuBackend::Sqlite).await;

    let mut ids = Vec::new();
    for _ in 0..4 {
        let placed = state
            .pipeline
            .place_order(&dosa_and_naan(), OrderType::Takeaway, PaymentMethod::Upi, None, DiscountRate::none())
            .await
            .unwrap();
        ids.push(placed.order.id);
    }

    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(state.orders().count_lines().await.unwrap(), 8);

    let archived = BillArchive::new(state.config.bill_archive_path()).read_all().await;
    assert_eq!(archived.len(), 4);
    assert_eq!(archived.iter().map(|r| r.order_id).collect::<Vec<_>>(), ids);
    assert_eq!(archived[0].items, dosa_and_naan());
}

#[tokio::test]
async fn takeaway_drops_table_number() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(dir.path(), MenuBackend::Sqlite).await;

    let placed = state
        .pipeline
        .place_order(&dosa_and_naan(), OrderType::Takeaway, PaymentMethod::Cash, Some(12), DiscountRate::none())
        .await
        .unwrap();

    assert_eq!(placed.order.table_number, None);
    let stored = state.orders().get_order(placed.order.id).await.unwrap().unwrap();
    assert_eq!(stored.table_number, None);
}

#[tokio::test]
async fn failing_sink_does_not_fail_the_order() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let archive = Arc::new(BillArchive::new(dir.path().join("bills.json")));

    let pipeline = OrderPipeline::new(Arc::new(db.orders()), TaxRate::from_bps(500))
        .with_sink(Arc::new(FailingSink))
        .with_sink(archive.clone());

    let placed = pipeline
        .place_order(&dosa_and_naan(), OrderType::DineIn, PaymentMethod::Card, Some(1), DiscountRate::none())
        .await
        .unwrap();

    assert_eq!(placed.failed_sinks, vec!["always_fails"]);
    assert_eq!(db.orders().count_orders().await.unwrap(), 1);
    assert_eq!(archive.read_all().await.len(), 1);
}

#[tokio::test]
async fn menu_upsert_on_both_backends() {
    for backend in [MenuBackend::Sqlite, MenuBackend::Csv] {
        let dir = tempfile::tempdir().unwrap();
        let state = open_state(dir.path(), backend).await;

        // seeded on open
        let seeded = state.menu.load().await.unwrap();
        assert_eq!(seeded.len(), 5, "{:?}", backend);

        let idli = MenuItem::new("Idli", "Breakfast", Money::from_cents(4500));
        state.menu.upsert(&idli).await.unwrap();
        let coffee = MenuItem::new("Filter Coffee", "Beverages", Money::from_cents(2500));
        state.menu.upsert(&coffee).await.unwrap();

        let menu = state.menu.load().await.unwrap();
        assert_eq!(menu.len(), 6, "{:?}", backend);
        assert_eq!(menu.iter().filter(|i| i.name == "Idli").count(), 1);

        let stored = state.menu.find_by_name("Idli").await.unwrap().unwrap();
        assert_eq!(stored.category, "Breakfast");
        assert_eq!(stored.price_cents, 4500);
        assert!(state.menu.find_by_name("idli").await.unwrap().is_none());

        // padded names would not survive a CSV reload, so neither backend takes them
        let padded = MenuItem::new("Idli ", "Other", Money::from_cents(9900));
        assert!(matches!(state.menu.upsert(&padded).await, Err(DbError::Invalid(_))), "{:?}", backend);
        assert_eq!(state.menu.load().await.unwrap().len(), 6, "{:?}", backend);
        assert_eq!(state.menu.find_by_name("Idli").await.unwrap().unwrap().price_cents, 4500);
        assert!(state.menu.find_by_name("Idli ").await.unwrap().is_none());
    }
}
