use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::collections::{self, CollectionOutcome};
use crate::db::Stores;
use crate::error::Result;
use crate::fmt::money;
use crate::ledger::parse_amount;
use crate::models::{CollectionType, Month};
use crate::receipt::Receipts;
use crate::settings::Settings;

pub fn run(
    stores: &Stores,
    settings: &Settings,
    apartment: &str,
    month: &str,
    collection_type: &str,
    amount: Option<&str>,
) -> Result<()> {
    let month: Month = month.parse()?;
    let collection_type: CollectionType = collection_type.parse()?;
    let price = match amount {
        Some(raw) => parse_amount(raw)?,
        None => settings.maintenance_fee,
    };
    let receipts = Receipts::from_settings(settings);

    let outcome =
        collections::record_collection(&stores.records, &receipts, apartment, month, collection_type, price)?;
    let collection = outcome.collection();
    let id = collection.id;
    println!(
        "{} #{} for {} ({} {}): {}",
        "Collection recorded".green().bold(),
        id,
        collection.apartment_id,
        collection.month,
        collection.collection_type,
        money(collection.price, &settings.currency_symbol)
    );

    match outcome {
        CollectionOutcome::Recorded { receipt, .. } => {
            println!("Receipt written to {}", receipt.display());
            Ok(())
        }
        CollectionOutcome::ReceiptFailed { error, .. } => {
            eprintln!(
                "{} collection #{id} was saved but its receipt could not be written. \
                 Retry with `aptkeeper receipt {id}`.",
                "Warning:".yellow().bold(),
            );
            Err(error)
        }
    }
}

pub fn list(stores: &Stores, settings: &Settings, apartment: Option<&str>) -> Result<()> {
    let rows = collections::list_collections(&stores.records, apartment)?;
    let mut table = Table::new();
    table.set_header(vec!["Receipt #", "Date", "Apartment", "Month", "Type", "Amount"]);
    for c in &rows {
        table.add_row(vec![
            Cell::new(c.id),
            Cell::new(c.receipt_date()),
            Cell::new(&c.apartment_id),
            Cell::new(c.month),
            Cell::new(c.collection_type),
            Cell::new(money(c.price, &settings.currency_symbol)),
        ]);
    }
    println!("Collections ({})\n{table}", rows.len());
    Ok(())
}

pub fn receipt(stores: &Stores, settings: &Settings, id: i64) -> Result<()> {
    let receipts = Receipts::from_settings(settings);
    let path = collections::regenerate_receipt(&stores.records, &receipts, id)?;
    println!("Receipt written to {}", path.display());
    Ok(())
}
