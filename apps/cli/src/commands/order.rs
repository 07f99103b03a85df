//! `bistro order`

use anyhow::{anyhow, bail};
use std::io::Write;

use bistro_core::{render_receipt, CoreError, MenuItem, OrderDraft, OrderLine, MAX_ITEM_QUANTITY};
use bistro_db::{DbError, MenuStore, OrderStore};

use crate::cli::PlaceArgs;
use crate::pipeline::PlacedOrder;
use crate::state::AppState;

/// Splits `NAME=QTY` into its parts. A bare name means one portion.
///
/// The split is on the last `=` so names may contain one.
pub fn parse_item_spec(spec: &str) -> anyhow::Result<(String, i64)> {
    let (name, qty) = match spec.rsplit_once('=') {
        Some((name, qty)) => {
            let qty = qty
                .trim()
                .parse::<i64>()
                .map_err(|_| anyhow!("'{}' is not a whole quantity in '{}'", qty.trim(), spec))?;
            (name.trim(), qty)
        }
        None => (spec.trim(), 1),
    };

    if name.is_empty() {
        bail!("missing item name in '{}'", spec);
    }
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        bail!("quantity for {} must be between 1 and {}", name, MAX_ITEM_QUANTITY);
    }
    Ok((name.to_string(), qty))
}

/// Resolves item specs against the menu, merging repeated items.
pub async fn build_lines(menu: &dyn MenuStore, specs: &[String]) -> anyhow::Result<Vec<OrderLine>> {
    let mut draft = OrderDraft::new();
    for spec in specs {
        let (name, qty) = parse_item_spec(spec)?;
        let item: MenuItem = menu
            .find_by_name(&name)
            .await?
            .ok_or(CoreError::ItemNotFound(name))?;
        draft.add_item(&item, qty)?;
    }
    Ok(draft.lines().to_vec())
}

pub async fn place(state: &AppState, args: PlaceArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let lines = build_lines(state.menu.as_ref(), &args.items).await?;

    let placed = state
        .pipeline
        .place_order(&lines, args.order_type, args.payment, args.table, args.discount)
        .await?;

    write_placed(state, &placed, out)?;
    Ok(())
}

/// Prints the receipt of a freshly placed order and any sink failures.
pub(crate) fn write_placed(state: &AppState, placed: &PlacedOrder, out: &mut impl Write) -> std::io::Result<()> {
    let receipt = render_receipt(&placed.order, &placed.lines, &state.config.receipt_options());
    writeln!(out, "{}", receipt)?;

    if !placed.fully_recorded() {
        writeln!(
            out,
            "Order {} saved, but not recorded in: {}",
            placed.order.id,
            placed.failed_sinks.join(", ")
        )?;
    }
    Ok(())
}

/// Reprints the receipt of a stored order.
pub async fn show(state: &AppState, id: i64, out: &mut impl Write) -> anyhow::Result<()> {
    let orders = state.orders();
    let order = orders
        .get_order(id)
        .await?
        .ok_or_else(|| DbError::not_found("Order", id.to_string()))?;
    let lines = orders.get_lines(id).await?;

    writeln!(out, "{}", render_receipt(&order, &lines, &state.config.receipt_options()))?;
    Ok(())
}

pub async fn recent(state: &AppState, limit: i64, out: &mut impl Write) -> anyhow::Result<()> {
    let orders = state.orders().recent(limit).await?;
    if orders.is_empty() {
        writeln!(out, "No orders yet.")?;
        return Ok(());
    }

    let symbol = &state.config.store.currency_symbol;
    for order in orders {
        let table = order
            .table_number
            .map(|t| format!("table {}", t))
            .unwrap_or_default();
        writeln!(
            out,
            "#{:<6} {}  {:<8} {:<9} {:>12}  {}",
            order.id,
            order.created_at.format("%Y-%m-%d %H:%M:%S"),
            order.order_type,
            table,
            order.total().format_with_symbol(symbol),
            order.payment_method,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_spec() {
        assert_eq!(parse_item_spec("Masala Dosa=2").unwrap(), ("Masala Dosa".to_string(), 2));
        assert_eq!(parse_item_spec(" Idli ").unwrap(), ("Idli".to_string(), 1));
        assert_eq!(parse_item_spec("Veg Thali = 3").unwrap(), ("Veg Thali".to_string(), 3));
        assert_eq!(parse_item_spec("A=B=4").unwrap(), ("A=B".to_string(), 4));
    }

    #[test]
    fn test_parse_item_spec_rejects_bad_input() {
        assert!(parse_item_spec("Idli=two").is_err());
        assert!(parse_item_spec("Idli=0").is_err());
        assert!(parse_item_spec("Idli=-1").is_err());
        assert!(parse_item_spec("Idli=1000").is_err());
        assert!(parse_item_spec("=2").is_err());
    }
}
