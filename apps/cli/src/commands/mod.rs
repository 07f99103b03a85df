//! # Commands
//!
//! One module per top-level subcommand. Every command writes its output to
//! the `out` it is given so tests can read it back.
//!
//! ```text
//! bistro menu    list | set | seed          → menu.rs
//! bistro order   place | show | recent      → order.rs
//! bistro report  daily | top-items          → report.rs
//! bistro console                            → console.rs
//! ```

pub mod console;
pub mod menu;
pub mod order;
pub mod report;

use std::io::Write;

use crate::cli::{Command, MenuCommand, OrderCommand, ReportCommand};
use crate::state::AppState;

/// Runs one parsed command against the opened application state.
pub async fn dispatch(state: &AppState, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Menu(cmd) => match cmd {
            MenuCommand::List => menu::list(state, out).await,
            MenuCommand::Set {
                name,
                category,
                price,
                tax,
            } => menu::set(state, name, category, price, tax, out).await,
            MenuCommand::Seed => menu::seed(state, out).await,
        },
        Command::Order(cmd) => match cmd {
            OrderCommand::Place(args) => order::place(state, args, out).await,
            OrderCommand::Show { id } => order::show(state, id, out).await,
            OrderCommand::Recent { limit } => order::recent(state, limit, out).await,
        },
        Command::Report(cmd) => match cmd {
            ReportCommand::Daily { date } => report::daily(state, date, out).await,
            ReportCommand::TopItems { days, limit } => {
                report::top_items(state, days, limit, out).await
            }
        },
        Command::Console => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            console::run(state, stdin, out).await
        }
    }
}
