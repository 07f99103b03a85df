//! # bistro-ledger: Auxiliary Logs for Bistro POS
//!
//! Secondary records of committed orders. Nothing here is read back by the
//! order pipeline; the files exist for people and for downstream reporting.
//!
//! ## Where This Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderPipeline::place_order                                             │
//! │       │                                                                 │
//! │       ├── 1. validate + compute bill            (bistro-core)           │
//! │       ├── 2. commit header + lines              (bistro-db)             │
//! │       │                                                                 │
//! │       └── 3. for each sink, in its own task     (THIS CRATE)            │
//! │              ├── BillArchive    ─► bills.json                           │
//! │              ├── SalesLedger    ─► sales.csv                            │
//! │              └── ReceiptWriter  ─► receipts/receipt_{id}.txt            │
//! │                                                                         │
//! │  A sink that fails is logged and named in the result. The order stays   │
//! │  committed.                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod archive;
pub mod error;
pub mod receipt;
pub mod sales;
pub mod sink;

pub use archive::BillArchive;
pub use error::{LedgerError, LedgerResult};
pub use receipt::ReceiptWriter;
pub use sales::{LedgerEntry, SalesLedger};
pub use sink::{AuxiliarySink, BillRecord};
