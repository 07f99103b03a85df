//! Receipt files: `receipt_{order_id}.txt`, one per order.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use bistro_core::{render_receipt, ReceiptOptions};

use crate::error::{LedgerError, LedgerResult};
use crate::sink::{ensure_parent, AuxiliarySink, BillRecord};

#[derive(Debug, Clone)]
pub struct ReceiptWriter {
    dir: PathBuf,
    options: ReceiptOptions,
}

impl ReceiptWriter {
    pub fn new(dir: impl Into<PathBuf>, options: ReceiptOptions) -> Self {
        ReceiptWriter {
            dir: dir.into(),
            options,
        }
    }

    /// Where the receipt for `order_id` is written.
    pub fn path_for(&self, order_id: i64) -> PathBuf {
        self.dir.join(format!("receipt_{}.txt", order_id))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl AuxiliarySink for ReceiptWriter {
    fn name(&self) -> &'static str {
        "receipt"
    }

    async fn append(&self, record: &BillRecord) -> LedgerResult<()> {
        let path = self.path_for(record.order_id);
        let text = render_receipt(&record.order(), &record.items, &self.options);

        ensure_parent(&path).await?;
        tokio::fs::write(&path, text)
            .await
            .map_err(|e| LedgerError::io(&path, e))?;

        debug!(order_id = record.order_id, path = %path.display(), "Receipt written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::fixtures::record;
    use bistro_core::TaxRate;

    #[tokio::test]
    async fn test_receipt_file_per_order() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReceiptWriter::new(
            dir.path().join("receipts"),
            ReceiptOptions {
                store_name: "Bistro".to_string(),
                currency_symbol: "₹".to_string(),
                tax_rate: Some(TaxRate::from_bps(500)),
            },
        );

        writer.append(&record(7)).await.unwrap();

        let text = std::fs::read_to_string(writer.path_for(7)).unwrap();
        assert!(text.contains("Order ID: 7\n"));
        assert!(text.contains("Table: 3\n"));
        assert!(text.contains("Butter Naan x1 @ ₹30.00 = ₹30.00\n"));
        assert!(text.contains("Discount: ₹19.00\n"));
        assert!(text.contains("TOTAL: ₹180.50\n"));
    }
}
