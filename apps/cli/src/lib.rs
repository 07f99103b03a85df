//! # bistro_cli: The Till
//!
//! Library half of the `bistro` binary. `main.rs` only parses arguments and
//! calls into here, so everything below can be driven from tests.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  main ──► init_tracing ──► AppConfig::load ──► AppState::open           │
//! │                                                    │                    │
//! │                                      commands::dispatch(command)        │
//! │                                                    │                    │
//! │              ┌─────────────────┬───────────────────┼──────────────┐     │
//! │              ▼                 ▼                   ▼              ▼     │
//! │         menu store       OrderPipeline       ReportRepository  console  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod state;

pub use config::{AppConfig, ConfigError, MenuBackend};
pub use error::OrderError;
pub use pipeline::{OrderPipeline, PlacedOrder};
pub use state::AppState;

use tracing_subscriber::EnvFilter;

/// Filter used when neither `--log-level` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,bistro=debug,sqlx=warn";

/// Installs the global tracing subscriber. Logs go to stderr so receipts and
/// reports on stdout stay clean.
///
/// An explicit `level` wins over `RUST_LOG`.
pub fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
