//! # Application Configuration
//!
//! Everything the till needs to know before it opens: who it prints
//! receipts for, how it taxes, and where every file lives.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     BISTRO_STORE_NAME, BISTRO_TAX_RATE, BISTRO_MENU_BACKEND,            │
//! │     BISTRO_DATA_DIR, BISTRO_DB_PATH, ...                                │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     --config <path>, else the platform config dir:                      │
//! │     ~/.config/bistro-pos/bistro.toml (Linux)                            │
//! │     ~/Library/Application Support/com.bistro.pos/bistro.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Bistro"
//! currency_symbol = "₹"
//! tax_rate_bps = 500          # 5%
//!
//! [menu]
//! backend = "sqlite"          # sqlite | csv
//!
//! [paths]
//! data_dir = "data"
//! # Optional, default to files inside data_dir:
//! # database = "data/bistro.db"
//! # menu_csv = "data/menu.csv"
//! # bill_archive = "data/bills.json"
//! # sales_ledger = "data/sales.csv"
//! # receipts_dir = "data/receipts"
//! # reports_dir = "data/reports"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

use bistro_core::validation::validate_tax_rate_bps;
use bistro_core::{ReceiptOptions, TaxRate, DEFAULT_TAX_RATE_BPS};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

/// Which menu store backs the till.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuBackend {
    /// `menu_items` table in the database.
    #[default]
    Sqlite,
    /// Flat CSV file.
    Csv,
}

impl FromStr for MenuBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "db" | "database" => Ok(MenuBackend::Sqlite),
            "csv" | "file" => Ok(MenuBackend::Csv),
            other => Err(ConfigError::Invalid(format!(
                "menu backend must be sqlite or csv, got '{}'",
                other
            ))),
        }
    }
}

/// Printed on receipts and used for the bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub name: String,
    pub currency_symbol: String,
    /// Tax applied to every order, in basis points (500 = 5%).
    pub tax_rate_bps: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: "Restaurant Billing System".to_string(),
            currency_symbol: "₹".to_string(),
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuSettings {
    pub backend: MenuBackend,
}

/// File locations. Unset paths resolve inside `data_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub data_dir: PathBuf,
    pub database: Option<PathBuf>,
    pub menu_csv: Option<PathBuf>,
    pub bill_archive: Option<PathBuf>,
    pub sales_ledger: Option<PathBuf>,
    pub receipts_dir: Option<PathBuf>,
    pub reports_dir: Option<PathBuf>,
}

impl Default for PathSettings {
    fn default() -> Self {
        PathSettings {
            data_dir: PathBuf::from("data"),
            database: None,
            menu_csv: None,
            bill_archive: None,
            sales_ledger: None,
            receipts_dir: None,
            reports_dir: None,
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub menu: MenuSettings,
    pub paths: PathSettings,
}

impl AppConfig {
    /// Default configuration with every file under `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let mut config = AppConfig::default();
        config.paths.data_dir = data_dir.into();
        config
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else the platform default if present)
    /// 3. `BISTRO_*` environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            // An explicit path must exist
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    AppConfig::default()
                }
                None => AppConfig::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `BISTRO_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("BISTRO_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(symbol) = lookup("BISTRO_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }

        // Percent, e.g. "5" or "12.5"
        if let Some(rate) = lookup("BISTRO_TAX_RATE") {
            match TaxRate::parse_percent(&rate) {
                Ok(parsed) => {
                    debug!(bps = parsed.bps(), "Overriding tax rate from environment");
                    self.store.tax_rate_bps = parsed.bps();
                }
                Err(e) => warn!(value = %rate, error = %e, "Ignoring BISTRO_TAX_RATE"),
            }
        }

        if let Some(backend) = lookup("BISTRO_MENU_BACKEND") {
            match backend.parse() {
                Ok(parsed) => self.menu.backend = parsed,
                Err(e) => warn!(value = %backend, error = %e, "Ignoring BISTRO_MENU_BACKEND"),
            }
        }

        if let Some(dir) = lookup("BISTRO_DATA_DIR") {
            self.paths.data_dir = PathBuf::from(dir);
        }

        let paths = &mut self.paths;
        for (key, slot) in [
            ("BISTRO_DB_PATH", &mut paths.database),
            ("BISTRO_MENU_CSV", &mut paths.menu_csv),
            ("BISTRO_BILL_ARCHIVE", &mut paths.bill_archive),
            ("BISTRO_SALES_LEDGER", &mut paths.sales_ledger),
            ("BISTRO_RECEIPTS_DIR", &mut paths.receipts_dir),
            ("BISTRO_REPORTS_DIR", &mut paths.reports_dir),
        ] {
            if let Some(value) = lookup(key) {
                *slot = Some(PathBuf::from(value));
            }
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_tax_rate_bps(self.store.tax_rate_bps)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store name must not be empty".into()));
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bistro", "pos")
            .map(|dirs| dirs.config_dir().join("bistro.toml"))
    }

    // =========================================================================
    // Resolved Values
    // =========================================================================

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.store.tax_rate_bps)
    }

    pub fn receipt_options(&self) -> ReceiptOptions {
        ReceiptOptions {
            store_name: self.store.name.clone(),
            currency_symbol: self.store.currency_symbol.clone(),
            tax_rate: Some(self.tax_rate()),
        }
    }

    fn resolve(&self, explicit: &Option<PathBuf>, default_name: &str) -> PathBuf {
        explicit
            .clone()
            .unwrap_or_else(|| self.paths.data_dir.join(default_name))
    }

    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.paths.database, "bistro.db")
    }

    pub fn menu_csv_path(&self) -> PathBuf {
        self.resolve(&self.paths.menu_csv, "menu.csv")
    }

    pub fn bill_archive_path(&self) -> PathBuf {
        self.resolve(&self.paths.bill_archive, "bills.json")
    }

    pub fn sales_ledger_path(&self) -> PathBuf {
        self.resolve(&self.paths.sales_ledger, "sales.csv")
    }

    pub fn receipts_dir(&self) -> PathBuf {
        self.resolve(&self.paths.receipts_dir, "receipts")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.resolve(&self.paths.reports_dir, "reports")
    }
}
