//! # Sales Ledger
//!
//! One CSV row per committed order, appended to a growing file.
//!
//! ```text
//! datetime,amount,payment_method
//! 2026-10-19 19:05:42,180.50,Cash
//! 2026-10-19 19:12:03,126.00,UPI
//! ```
//!
//! The header is written only when the file is first created.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::sink::{ensure_parent, AuxiliarySink, BillRecord};

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub datetime: String,
    /// Order total as a decimal, e.g. `180.50`.
    pub amount: String,
    pub payment_method: String,
}

impl LedgerEntry {
    fn from_record(record: &BillRecord) -> Self {
        LedgerEntry {
            datetime: record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            amount: record.summary.total.to_decimal_string(),
            payment_method: record.payment_method.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct SalesLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SalesLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SalesLedger {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every row back. A missing file has no rows.
    pub async fn read_entries(&self) -> LedgerResult<Vec<LedgerEntry>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LedgerError::io(&self.path, e)),
        };

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let entries = reader
            .deserialize::<LedgerEntry>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

#[async_trait]
impl AuxiliarySink for SalesLedger {
    fn name(&self) -> &'static str {
        "sales_ledger"
    }

    async fn append(&self, record: &BillRecord) -> LedgerResult<()> {
        let _guard = self.lock.lock().await;

        ensure_parent(&self.path).await?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| LedgerError::io(&self.path, e))?;

        let is_new = file
            .metadata()
            .await
            .map_err(|e| LedgerError::io(&self.path, e))?
            .len()
            == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(Vec::new());
        writer.serialize(LedgerEntry::from_record(record))?;
        let row = writer
            .into_inner()
            .map_err(|e| LedgerError::io(&self.path, std::io::Error::other(e.to_string())))?;

        file.write_all(&row)
            .await
            .map_err(|e| LedgerError::io(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| LedgerError::io(&self.path, e))?;

        debug!(order_id = record.order_id, header = is_new, "Sale appended to ledger");
        Ok(())
    }
}
