use std::path::PathBuf;

use rusqlite::{Connection, OptionalExtension, Row};
use tracing::{info, warn};

use crate::apartments;
use crate::error::{AppError, Result};
use crate::models::{Collection, CollectionType, Month};
use crate::receipt::Receipts;

const SELECT_COLUMNS: &str = "SELECT id, apartment_id, month, type, price, datetime(date) FROM collections";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Collection> {
    Ok(Collection {
        id: row.get(0)?,
        apartment_id: row.get(1)?,
        month: row.get(2)?,
        collection_type: row.get(3)?,
        price: row.get(4)?,
        date: row.get(5)?,
    })
}

/// Result of processing a collection. The database row and the receipt file
/// are written separately, so the row can exist without its receipt.
#[derive(Debug)]
pub enum CollectionOutcome {
    Recorded {
        collection: Collection,
        receipt: PathBuf,
    },
    ReceiptFailed {
        collection: Collection,
        error: AppError,
    },
}

impl CollectionOutcome {
    pub fn collection(&self) -> &Collection {
        match self {
            Self::Recorded { collection, .. } | Self::ReceiptFailed { collection, .. } => collection,
        }
    }
}

/// Insert a collection against an existing apartment and write its receipt.
/// Errors only when nothing was recorded; a failed receipt after a committed
/// row comes back as [`CollectionOutcome::ReceiptFailed`].
pub fn record_collection(
    conn: &Connection,
    receipts: &Receipts,
    apartment_id: &str,
    month: Month,
    collection_type: CollectionType,
    price: f64,
) -> Result<CollectionOutcome> {
    if !price.is_finite() {
        return Err(AppError::Validation(format!("invalid price: {price}")));
    }
    let apartment = apartments::get(conn, apartment_id)?;

    conn.execute(
        "INSERT INTO collections (apartment_id, month, type, price) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![apartment.id, month, collection_type, price],
    )?;
    let collection = get_collection(conn, conn.last_insert_rowid())?;
    info!(id = collection.id, apartment = %collection.apartment_id, %month, "collection recorded");

    match receipts.write(&collection) {
        Ok(receipt) => Ok(CollectionOutcome::Recorded { collection, receipt }),
        Err(error) => {
            warn!(id = collection.id, %error, "collection recorded but receipt failed");
            Ok(CollectionOutcome::ReceiptFailed { collection, error })
        }
    }
}

/// Write the receipt for an already recorded collection again.
pub fn regenerate_receipt(conn: &Connection, receipts: &Receipts, id: i64) -> Result<PathBuf> {
    let collection = get_collection(conn, id)?;
    receipts.write(&collection)
}

pub fn get_collection(conn: &Connection, id: i64) -> Result<Collection> {
    conn.query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), [id], from_row)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("collection {id}")))
}

/// Collections newest first, optionally for one apartment.
pub fn list_collections(conn: &Connection, apartment_id: Option<&str>) -> Result<Vec<Collection>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE ?1 IS NULL OR apartment_id = ?1 ORDER BY date DESC, id DESC"
    ))?;
    let rows = stmt
        .query_map([apartment_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
