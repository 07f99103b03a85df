//! # Bill Archive
//!
//! A JSON array holding every bill ever placed.
//!
//! ## Append
//! ```text
//! read bills.json ──► Vec<BillRecord> ──► push(record) ──► bills.json.tmp ──► rename
//!      │
//!      └── missing / unreadable / not a bill array → start from []
//! ```
//!
//! An unreadable archive is replaced, not repaired. The warning log is the
//! only trace of the discarded content.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::sink::{ensure_parent, AuxiliarySink, BillRecord};

#[derive(Debug)]
pub struct BillArchive {
    path: PathBuf,
    lock: Mutex<()>,
}

impl BillArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BillArchive {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every archived bill, oldest first. Never fails: anything unreadable
    /// reads as an empty archive.
    pub async fn read_all(&self) -> Vec<BillRecord> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Bill archive unreadable, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<BillRecord>>(&bytes) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Bill archive corrupt, treating as empty");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl AuxiliarySink for BillArchive {
    fn name(&self) -> &'static str {
        "bill_archive"
    }

    async fn append(&self, record: &BillRecord) -> LedgerResult<()> {
        let _guard = self.lock.lock().await;

        let mut records = self.read_all().await;
        records.push(record.clone());
        let data = serde_json::to_vec_pretty(&records)?;

        ensure_parent(&self.path).await?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, data)
            .await
            .map_err(|e| LedgerError::io(&temp_path, e))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| LedgerError::io(&self.path, e))?;

        debug!(order_id = record.order_id, archived = records.len(), "Bill archived");
        Ok(())
    }
}
