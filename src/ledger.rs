use rusqlite::{Connection, Row};
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{ExpenseType, Month, Payment, TransactionType};

const SELECT_COLUMNS: &str =
    "SELECT id, month, type, price, transaction_type, datetime(date) FROM payments";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: row.get(0)?,
        month: row.get(1)?,
        expense_type: row.get(2)?,
        price: row.get(3)?,
        transaction_type: row.get(4)?,
        date: row.get(5)?,
    })
}

/// Parse a user-entered amount. Any finite decimal is accepted.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(AppError::Validation("amount is required".to_string()));
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AppError::Validation(format!("invalid amount: '{s}'"))),
    }
}

pub fn record_transaction(
    conn: &Connection,
    month: Month,
    expense_type: ExpenseType,
    amount: f64,
    transaction_type: TransactionType,
) -> Result<Payment> {
    if !amount.is_finite() {
        return Err(AppError::Validation(format!("invalid amount: {amount}")));
    }
    conn.execute(
        "INSERT INTO payments (month, type, price, transaction_type) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![month, expense_type, amount, transaction_type],
    )?;
    let payment = conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        [conn.last_insert_rowid()],
        from_row,
    )?;
    info!(id = payment.id, %transaction_type, amount, "ledger entry recorded");
    Ok(payment)
}

/// Up to `limit` entries, newest first.
pub fn recent_transactions(conn: &Connection, limit: usize) -> Result<Vec<Payment>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY date DESC, id DESC LIMIT ?1"))?;
    let rows = stmt
        .query_map([limit as i64], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
