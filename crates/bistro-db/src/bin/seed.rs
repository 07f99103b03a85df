//! # Menu Seeder
//!
//! Writes the sample menu into an empty store.
//!
//! ## Usage
//! ```bash
//! # Seed the SQLite menu (default ./bistro_dev.db)
//! cargo run -p bistro-db --bin seed
//!
//! # Specify database path
//! cargo run -p bistro-db --bin seed -- --db ./data/bistro.db
//!
//! # Seed a CSV menu file instead
//! cargo run -p bistro-db --bin seed -- --csv ./data/menu.csv
//! ```

use bistro_db::{default_menu, CsvMenuStore, Database, DbConfig, MenuStore};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./bistro_dev.db");
    let mut csv_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--csv" | "-c" => {
                if i + 1 < args.len() {
                    csv_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bistro POS Menu Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./bistro_dev.db)");
                println!("  -c, --csv <PATH>   Seed a CSV menu file instead of the database");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Bistro POS Menu Seeder");
    println!("======================");

    let store: Box<dyn MenuStore> = match csv_path {
        Some(path) => {
            println!("Menu file: {}", path);
            Box::new(CsvMenuStore::new(path))
        }
        None => {
            println!("Database: {}", db_path);
            let db = Database::new(DbConfig::new(&db_path)).await?;
            println!("✓ Migrations applied");
            Box::new(db.menu())
        }
    };

    let written = store.seed_if_empty(&default_menu()).await?;
    if written == 0 {
        let existing = store.load().await?.len();
        println!("⚠ Menu already has {} items, nothing written", existing);
        return Ok(());
    }

    println!("✓ Wrote {} menu items", written);
    for item in store.load().await? {
        println!(
            "  {:<24} {:<14} {:>8}  GST {}%",
            item.name,
            item.category,
            item.price().to_decimal_string(),
            item.tax_rate().to_percent_string()
        );
    }

    Ok(())
}
