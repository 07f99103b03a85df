//! Command-line surface of the `bistro` binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use bistro_core::{DiscountRate, Money, OrderType, PaymentMethod, TaxRate};

/// Bistro POS: restaurant billing from the terminal.
#[derive(Parser, Debug)]
#[command(name = "bistro", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "BISTRO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides RUST_LOG.
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show or edit the menu
    #[command(subcommand)]
    Menu(MenuCommand),

    /// Place and look up orders
    #[command(subcommand)]
    Order(OrderCommand),

    /// Sales reports (printed and exported as CSV)
    #[command(subcommand)]
    Report(ReportCommand),

    /// Interactive order entry at the counter
    Console,
}

#[derive(Subcommand, Debug)]
pub enum MenuCommand {
    /// List every item on the menu
    List,

    /// Add an item, or overwrite the item with the same name
    Set {
        name: String,
        #[arg(long)]
        category: String,
        /// Price, e.g. 80 or 79.50
        #[arg(long, value_parser = parse_money)]
        price: Money,
        /// Tax percentage, e.g. 5
        #[arg(long, value_parser = parse_tax_percent)]
        tax: Option<TaxRate>,
    },

    /// Write the sample menu if the menu is empty
    Seed,
}

#[derive(Subcommand, Debug)]
pub enum OrderCommand {
    /// Place an order from menu items
    Place(PlaceArgs),

    /// Print the receipt of a stored order
    Show { id: i64 },

    /// List the most recent orders
    Recent {
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
}

#[derive(Args, Debug)]
pub struct PlaceArgs {
    /// Item and quantity as NAME=QTY, repeatable. QTY defaults to 1.
    #[arg(short, long = "item", required = true)]
    pub items: Vec<String>,

    /// Dine-In or Takeaway
    #[arg(short = 't', long = "type", default_value = "Dine-In")]
    pub order_type: OrderType,

    /// Table number (Dine-In only)
    #[arg(long)]
    pub table: Option<i64>,

    /// Cash, Card or UPI
    #[arg(short, long, default_value = "Cash")]
    pub payment: PaymentMethod,

    /// Discount percentage, e.g. 10
    #[arg(short, long, value_parser = parse_discount_percent, default_value = "0")]
    pub discount: DiscountRate,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Every order of one day (UTC)
    Daily {
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },

    /// Best-selling items over the last N days
    TopItems {
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[arg(long, default_value_t = 5)]
        limit: u32,
    },
}

fn parse_money(text: &str) -> Result<Money, String> {
    Money::parse(text).map_err(|e| e.to_string())
}

fn parse_tax_percent(text: &str) -> Result<TaxRate, String> {
    TaxRate::parse_percent(text).map_err(|e| e.to_string())
}

fn parse_discount_percent(text: &str) -> Result<DiscountRate, String> {
    DiscountRate::parse_percent(text).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_order_place() {
        let cli = Cli::parse_from([
            "bistro", "order", "place", "-i", "Masala Dosa=2", "-i", "Idli", "--type",
            "takeaway", "--payment", "upi", "--discount", "10",
        ]);

        let Command::Order(OrderCommand::Place(args)) = cli.command else {
            panic!("expected order place");
        };
        assert_eq!(args.items, vec!["Masala Dosa=2", "Idli"]);
        assert_eq!(args.order_type, OrderType::Takeaway);
        assert_eq!(args.payment, PaymentMethod::Upi);
        assert_eq!(args.discount.bps(), 1000);
        assert_eq!(args.table, None);
    }

    #[test]
    fn test_parse_menu_set() {
        let cli = Cli::parse_from([
            "bistro", "menu", "set", "Filter Coffee", "--category", "Beverages", "--price",
            "25.50", "--tax", "12",
        ]);

        let Command::Menu(MenuCommand::Set { name, price, tax, .. }) = cli.command else {
            panic!("expected menu set");
        };
        assert_eq!(name, "Filter Coffee");
        assert_eq!(price.cents(), 2550);
        assert_eq!(tax.map(|t| t.bps()), Some(1200));
    }

    #[test]
    fn test_rejects_bad_payment() {
        assert!(Cli::try_parse_from(["bistro", "order", "place", "-i", "Idli", "-p", "cheque"]).is_err());
    }
}
