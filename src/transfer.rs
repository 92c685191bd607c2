use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::apartments;
use crate::codec::Format;
use crate::error::Result;

/// Apply every row of a CSV/XLSX file as an apartment upsert. All rows
/// commit together or none do.
pub fn import_apartments(conn: &mut Connection, path: &Path) -> Result<usize> {
    let format = Format::from_path(path)?;
    let rows = format.read(path)?;

    let tx = conn.transaction()?;
    for apt in &rows {
        apartments::upsert(&tx, apt)?;
    }
    tx.commit()?;

    info!(path = %path.display(), rows = rows.len(), "imported apartments");
    Ok(rows.len())
}

/// Write every stored apartment, ordered by ID, to a CSV/XLSX file.
pub fn export_apartments(conn: &Connection, path: &Path) -> Result<usize> {
    let format = Format::from_path(path)?;
    let rows = apartments::list(conn)?;
    format.write(path, &rows)?;
    info!(path = %path.display(), rows = rows.len(), "exported apartments");
    Ok(rows.len())
}
