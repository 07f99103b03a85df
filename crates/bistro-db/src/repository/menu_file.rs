//! # CSV Menu Store
//!
//! Flat-file menu for restaurants that keep the menu in a spreadsheet.
//!
//! ## File Format
//! ```text
//! item_name,category,price,gst
//! Masala Dosa,South Indian,80.00,0.05
//! Idli,South Indian,40.00,0.05
//! ```
//!
//! - `price` is a decimal amount, `gst` a fraction (`0.05` = 5%)
//! - A missing `gst` column or cell means the house rate
//! - The file is rewritten whole on every change (temp file + rename)
//! - A missing file is an empty menu; unreadable rows are skipped with a warning

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use bistro_core::validation::validate_menu_item;
use bistro_core::{MenuItem, Money, TaxRate, ValidationError};

use crate::error::DbResult;
use crate::store::MenuStore;

/// One row of the menu file, exactly as written on disk.
#[derive(Debug, Serialize, Deserialize)]
struct MenuRow {
    item_name: String,
    #[serde(default)]
    category: String,
    price: String,
    #[serde(default)]
    gst: String,
}

impl MenuRow {
    fn from_item(item: &MenuItem) -> Self {
        MenuRow {
            item_name: item.name.clone(),
            category: item.category.clone(),
            price: item.price().to_decimal_string(),
            gst: item.tax_rate().to_fraction_string(),
        }
    }

    fn into_item(self) -> Result<MenuItem, ValidationError> {
        let price = Money::parse(&self.price)?;
        let tax = if self.gst.trim().is_empty() {
            TaxRate::default()
        } else {
            TaxRate::parse_fraction(&self.gst)?
        };

        let item = MenuItem::new(self.item_name.trim(), self.category.trim(), price)
            .with_tax_rate(tax);
        validate_menu_item(&item)?;
        Ok(item)
    }
}

/// Menu store backed by a CSV file.
#[derive(Debug)]
pub struct CsvMenuStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl CsvMenuStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvMenuStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_items(&self) -> DbResult<Vec<MenuItem>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Menu file not found, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut items: Vec<MenuItem> = Vec::new();
        for (index, record) in reader.deserialize::<MenuRow>().enumerate() {
            // Header is line 1
            let line = index + 2;

            let item = match record {
                Ok(row) => match row.into_item() {
                    Ok(item) => item,
                    Err(e) => {
                        warn!(path = %self.path.display(), line, error = %e, "Skipping invalid menu row");
                        continue;
                    }
                },
                Err(e) => {
                    warn!(path = %self.path.display(), line, error = %e, "Skipping malformed menu row");
                    continue;
                }
            };

            // A hand-edited file may repeat a name; the last row wins
            match items.iter_mut().find(|existing| existing.name == item.name) {
                Some(existing) => *existing = item,
                None => items.push(item),
            }
        }

        Ok(items)
    }

    async fn write_items(&self, items: &[MenuItem]) -> DbResult<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for item in items {
            writer.serialize(MenuRow::from_item(item))?;
        }
        let data = writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self.path.with_extension("csv.tmp");
        fs::write(&temp_path, data).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!(path = %self.path.display(), count = items.len(), "Menu file written");
        Ok(())
    }
}

#[async_trait]
impl MenuStore for CsvMenuStore {
    fn backend(&self) -> &'static str {
        "csv"
    }

    async fn load(&self) -> DbResult<Vec<MenuItem>> {
        self.read_items().await
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Option<MenuItem>> {
        Ok(self
            .read_items()
            .await?
            .into_iter()
            .find(|item| item.name == name))
    }

    async fn upsert(&self, item: &MenuItem) -> DbResult<()> {
        validate_menu_item(item)?;

        let _guard = self.write_lock.lock().await;
        let mut items = self.read_items().await?;

        match items.iter_mut().find(|existing| existing.name == item.name) {
            Some(existing) => {
                debug!(name = %item.name, "Overwriting menu item");
                *existing = item.clone();
            }
            None => {
                debug!(name = %item.name, "Appending menu item");
                items.push(item.clone());
            }
        }

        self.write_items(&items).await
    }

    async fn seed_if_empty(&self, defaults: &[MenuItem]) -> DbResult<usize> {
        for item in defaults {
            validate_menu_item(item)?;
        }

        let _guard = self.write_lock.lock().await;
        if !self.read_items().await?.is_empty() {
            return Ok(0);
        }

        self.write_items(defaults).await?;
        info!(path = %self.path.display(), count = defaults.len(), "Seeded default menu file");
        Ok(defaults.len())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::default_menu;

    fn store_in(dir: &tempfile::TempDir) -> CsvMenuStore {
        CsvMenuStore::new(dir.path().join("data").join("menu.csv"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_menu() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.load().await.unwrap().is_empty());
        assert!(store.find_by_name("Idli").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.seed_if_empty(&default_menu()).await.unwrap(), 5);
        assert_eq!(store.seed_if_empty(&default_menu()).await.unwrap(), 0);

        let text = std::fs::read_to_string(store.path()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("item_name,category,price,gst"));
        assert_eq!(lines.next(), Some("Masala Dosa,South Indian,80.00,0.05"));

        assert_eq!(store.load().await.unwrap(), default_menu());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_then_appends() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.seed_if_empty(&default_menu()).await.unwrap();

        let idli = MenuItem::new("Idli", "Breakfast", Money::from_cents(4550));
        store.upsert(&idli).await.unwrap();
        let menu = store.load().await.unwrap();
        assert_eq!(menu.len(), 5);
        assert_eq!(menu[1], idli);

        store
            .upsert(&MenuItem::new("Lassi", "Beverage", Money::from_cents(6000)))
            .await
            .unwrap();
        assert_eq!(store.load().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_malformed_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            "item_name,category,price,gst\n\
             Idli,South Indian,40,0.05\n\
             Vada,South Indian,forty,0.05\n\
             Upma,South Indian,35\n\
             Idli,South Indian,42,0.05\n",
        )
        .unwrap();

        let menu = store.load().await.unwrap();
        assert_eq!(menu.len(), 2);
        assert_eq!(menu[0].price_cents, 4200);
        assert_eq!(menu[1].name, "Upma");
        assert_eq!(menu[1].tax_rate_bps, 500);
    }
}
