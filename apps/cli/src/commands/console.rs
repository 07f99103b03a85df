//! # Counter Console
//!
//! A prompt-driven loop for the person at the till.
//!
//! ```text
//! 1. Show Menu
//! 2. Place Order
//! 3. Exit
//! Enter choice: 2
//! Item name (blank to finish): Masala Dosa
//! Quantity: 2
//! Item name (blank to finish):
//! Mode (Dine-In/Takeaway) [Dine-In]:
//! Table number: 4
//! Payment method (Cash/Card/UPI) [Cash]: upi
//! Discount % [0]:
//! ```
//!
//! Bad input re-prompts or abandons the current order; it never ends the
//! session. End of input behaves like `Exit`.

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use bistro_core::validation::parse_table_number;
use bistro_core::{DiscountRate, OrderDraft, OrderType, PaymentMethod};

use crate::commands::menu::write_menu;
use crate::commands::order::write_placed;
use crate::error::OrderError;
use crate::state::AppState;

struct Prompter<'a, R, W> {
    lines: Lines<R>,
    out: &'a mut W,
}

impl<R, W> Prompter<'_, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Prints `label` and reads one trimmed line. `None` at end of input.
    async fn ask(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        write!(self.out, "{}", label)?;
        self.out.flush()?;
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }
}

/// Runs the console until the user exits or input ends.
pub async fn run<R, W>(state: &AppState, input: R, out: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut prompt = Prompter {
        lines: input.lines(),
        out,
    };

    loop {
        writeln!(prompt.out, "\n1. Show Menu\n2. Place Order\n3. Exit")?;
        let Some(choice) = prompt.ask("Enter choice: ").await? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                let items = state.menu.load().await?;
                write_menu(&items, &state.config.store.currency_symbol, &mut *prompt.out)?;
            }
            "2" => {
                if !take_order(state, &mut prompt).await? {
                    break;
                }
            }
            "3" | "q" | "quit" | "exit" => break,
            other => writeln!(prompt.out, "Unknown choice '{}'", other)?,
        }
    }

    debug!("Console closed");
    Ok(())
}

/// Collects one order and places it. Returns `false` at end of input.
async fn take_order<R, W>(state: &AppState, prompt: &mut Prompter<'_, R, W>) -> anyhow::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut draft = OrderDraft::new();

    loop {
        let Some(name) = prompt.ask("Item name (blank to finish): ").await? else {
            return Ok(false);
        };
        if name.is_empty() {
            break;
        }

        let Some(qty) = prompt.ask("Quantity: ").await? else {
            return Ok(false);
        };
        let Ok(qty) = qty.parse::<i64>() else {
            writeln!(prompt.out, "'{}' is not a whole number", qty)?;
            continue;
        };

        let Some(item) = state.menu.find_by_name(&name).await? else {
            writeln!(prompt.out, "Not found: {}", name)?;
            continue;
        };
        if let Err(e) = draft.add_item(&item, qty) {
            writeln!(prompt.out, "{}", e)?;
            continue;
        }

        let preview = draft.bill(state.pipeline.tax_rate());
        writeln!(
            prompt.out,
            "  {} lines, running total {}",
            draft.lines().len(),
            preview.total.format_with_symbol(&state.config.store.currency_symbol)
        )?;
    }

    if draft.is_empty() {
        return Ok(true);
    }

    let Some(mode) = prompt.ask("Mode (Dine-In/Takeaway) [Dine-In]: ").await? else {
        return Ok(false);
    };
    let order_type = if mode.is_empty() {
        OrderType::DineIn
    } else {
        match mode.parse::<OrderType>() {
            Ok(t) => t,
            Err(e) => {
                writeln!(prompt.out, "{}; order cancelled", e)?;
                return Ok(true);
            }
        }
    };

    let mut table_number = None;
    if order_type.requires_table() {
        let Some(table) = prompt.ask("Table number: ").await? else {
            return Ok(false);
        };
        if !table.is_empty() {
            match parse_table_number(&table) {
                Ok(n) => table_number = Some(n),
                Err(e) => {
                    writeln!(prompt.out, "{}; order cancelled", e)?;
                    return Ok(true);
                }
            }
        }
    }

    let Some(payment) = prompt.ask("Payment method (Cash/Card/UPI) [Cash]: ").await? else {
        return Ok(false);
    };
    let payment_method = if payment.is_empty() {
        PaymentMethod::Cash
    } else {
        match payment.parse::<PaymentMethod>() {
            Ok(p) => p,
            Err(e) => {
                writeln!(prompt.out, "{}; order cancelled", e)?;
                return Ok(true);
            }
        }
    };

    let Some(discount) = prompt.ask("Discount % [0]: ").await? else {
        return Ok(false);
    };
    if !discount.is_empty() {
        match DiscountRate::parse_percent(&discount) {
            Ok(rate) => draft.set_discount(rate),
            Err(e) => {
                writeln!(prompt.out, "{}; order cancelled", e)?;
                return Ok(true);
            }
        }
    }

    match state
        .pipeline
        .place_order(draft.lines(), order_type, payment_method, table_number, draft.discount())
        .await
    {
        Ok(placed) => {
            write_placed(state, &placed, &mut *prompt.out)?;
            writeln!(
                prompt.out,
                "Saved order {} Total: {}",
                placed.order.id,
                placed.order.total().format_with_symbol(&state.config.store.currency_symbol)
            )?;
        }
        Err(e @ OrderError::Storage(_)) => return Err(e.into()),
        Err(e) => writeln!(prompt.out, "{}", e)?,
    }

    Ok(true)
}
