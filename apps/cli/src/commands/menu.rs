//! `bistro menu`

use anyhow::Context;
use std::io::Write;

use bistro_core::{MenuItem, Money, TaxRate};
use bistro_db::default_menu;

use crate::state::AppState;

/// Prints the menu as a table.
pub async fn list(state: &AppState, out: &mut impl Write) -> anyhow::Result<()> {
    let items = state.menu.load().await.context("failed to load menu")?;
    write_menu(&items, &state.config.store.currency_symbol, out)?;
    Ok(())
}

pub(crate) fn write_menu(items: &[MenuItem], symbol: &str, out: &mut impl Write) -> std::io::Result<()> {
    if items.is_empty() {
        writeln!(out, "The menu is empty.")?;
        return Ok(());
    }

    let width = items.iter().map(|i| i.name.chars().count()).max().unwrap_or(4).max(4);
    writeln!(out, "{:<width$}  {:<14}  {:>10}  {:>5}", "Item", "Category", "Price", "Tax")?;
    for item in items {
        writeln!(
            out,
            "{:<width$}  {:<14}  {:>10}  {:>4}%",
            item.name,
            item.category,
            item.price().format_with_symbol(symbol),
            item.tax_rate().to_percent_string(),
        )?;
    }
    Ok(())
}

/// Adds or overwrites one item. Without `--tax` the configured rate applies.
pub async fn set(
    state: &AppState,
    name: String,
    category: String,
    price: Money,
    tax: Option<TaxRate>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let existed = state.menu.find_by_name(&name).await?.is_some();
    let item = MenuItem::new(name, category, price)
        .with_tax_rate(tax.unwrap_or_else(|| state.config.tax_rate()));

    state
        .menu
        .upsert(&item)
        .await
        .with_context(|| format!("failed to save '{}'", item.name))?;

    let verb = if existed { "Updated" } else { "Added" };
    writeln!(
        out,
        "{} {} ({}, {})",
        verb,
        item.name,
        item.category,
        item.price().format_with_symbol(&state.config.store.currency_symbol)
    )?;
    Ok(())
}

/// Writes the sample menu when the menu is empty.
pub async fn seed(state: &AppState, out: &mut impl Write) -> anyhow::Result<()> {
    let written = state.menu.seed_if_empty(&default_menu()).await?;
    if written == 0 {
        let existing = state.menu.load().await?.len();
        writeln!(out, "Menu already has {} items, nothing written", existing)?;
    } else {
        writeln!(out, "Seeded {} menu items", written)?;
    }
    Ok(())
}
