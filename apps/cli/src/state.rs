//! # Application State
//!
//! Everything a command needs, opened once at start-up.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState::open(config)                                                 │
//! │       │                                                                 │
//! │       ├── Database::new        ─► bistro.db (migrations applied)        │
//! │       ├── menu store           ─► SqliteMenuStore | CsvMenuStore        │
//! │       │      └── seed_if_empty(default_menu)                            │
//! │       └── OrderPipeline                                                 │
//! │              ├── OrderRepository (SQLite)                               │
//! │              ├── BillArchive   ─► bills.json                            │
//! │              ├── SalesLedger   ─► sales.csv                             │
//! │              └── ReceiptWriter ─► receipts/                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tracing::info;

use bistro_db::{
    default_menu, CsvMenuStore, Database, DbConfig, DbResult, MenuStore, OrderRepository,
    ReportRepository,
};
use bistro_ledger::{BillArchive, ReceiptWriter, SalesLedger};

use crate::config::{AppConfig, MenuBackend};
use crate::pipeline::OrderPipeline;

pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub menu: Arc<dyn MenuStore>,
    pub pipeline: OrderPipeline,
}

impl AppState {
    /// Opens the database at the configured path.
    pub async fn open(config: AppConfig) -> DbResult<Self> {
        let db = Database::new(DbConfig::new(config.database_path())).await?;
        Self::with_database(config, db).await
    }

    /// Builds the state around an already-open database.
    pub async fn with_database(config: AppConfig, db: Database) -> DbResult<Self> {
        let menu: Arc<dyn MenuStore> = match config.menu.backend {
            MenuBackend::Sqlite => Arc::new(db.menu()),
            MenuBackend::Csv => Arc::new(CsvMenuStore::new(config.menu_csv_path())),
        };

        let seeded = menu.seed_if_empty(&default_menu()).await?;
        if seeded > 0 {
            info!(backend = menu.backend(), items = seeded, "Seeded empty menu with defaults");
        }

        let pipeline = OrderPipeline::new(Arc::new(db.orders()), config.tax_rate())
            .with_sink(Arc::new(BillArchive::new(config.bill_archive_path())))
            .with_sink(Arc::new(SalesLedger::new(config.sales_ledger_path())))
            .with_sink(Arc::new(ReceiptWriter::new(
                config.receipts_dir(),
                config.receipt_options(),
            )));

        info!(
            database = %config.database_path().display(),
            menu = menu.backend(),
            tax_bps = config.tax_rate().bps(),
            "Application state ready"
        );

        Ok(AppState {
            config,
            db,
            menu,
            pipeline,
        })
    }

    pub fn orders(&self) -> OrderRepository {
        self.db.orders()
    }

    pub fn reports(&self) -> ReportRepository {
        self.db.reports()
    }
}
