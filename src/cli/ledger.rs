use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::Stores;
use crate::error::Result;
use crate::fmt::money;
use crate::ledger;
use crate::models::{ExpenseType, Month, TransactionType};
use crate::settings::Settings;

pub fn add(
    stores: &Stores,
    settings: &Settings,
    month: &str,
    expense_type: &str,
    amount: &str,
    kind: &str,
) -> Result<()> {
    let month: Month = month.parse()?;
    let expense_type: ExpenseType = expense_type.parse()?;
    let amount = ledger::parse_amount(amount)?;
    let kind: TransactionType = kind.parse()?;

    let p = ledger::record_transaction(&stores.records, month, expense_type, amount, kind)?;
    println!(
        "Recorded #{}: {} - {}: {} {}",
        p.id,
        p.month,
        p.expense_type,
        p.transaction_type,
        money(p.price, &settings.currency_symbol)
    );
    Ok(())
}

pub fn recent(stores: &Stores, settings: &Settings, limit: usize) -> Result<()> {
    let rows = ledger::recent_transactions(&stores.records, limit)?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Month", "Type", "Kind", "Amount"]);
    for p in &rows {
        let kind = match p.transaction_type {
            TransactionType::Credit => p.transaction_type.as_str().green(),
            TransactionType::Debit => p.transaction_type.as_str().red(),
        };
        table.add_row(vec![
            Cell::new(p.id),
            Cell::new(&p.date),
            Cell::new(p.month),
            Cell::new(p.expense_type),
            Cell::new(kind),
            Cell::new(money(p.price, &settings.currency_symbol)),
        ]);
    }
    println!("Recent Transactions (last {limit})\n{table}");
    Ok(())
}
