use rusqlite::{Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::Apartment;

fn from_row(row: &Row<'_>) -> rusqlite::Result<Apartment> {
    Ok(Apartment {
        id: row.get(0)?,
        owner: row.get(1)?,
        resident: row.get(2)?,
        same_flag: row.get::<_, i64>(3)? == 1,
    })
}

/// Insert the apartment, or overwrite the row that already has its ID.
/// Works on a plain connection or inside an open transaction.
pub fn upsert(conn: &Connection, apartment: &Apartment) -> Result<Apartment> {
    let mut apt = apartment.clone();
    apt.id = apt.id.trim().to_string();
    if apt.id.is_empty() {
        return Err(AppError::Validation("apartment ID is required".to_string()));
    }
    apt.normalize();

    conn.prepare_cached(
        "INSERT INTO apartments (id, owner, resident, same_flag) VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(id) DO UPDATE SET owner = excluded.owner, resident = excluded.resident, \
         same_flag = excluded.same_flag",
    )?
    .execute(rusqlite::params![apt.id, apt.owner, apt.resident, apt.same_flag as i64])?;
    debug!(id = %apt.id, same = apt.same_flag, "upserted apartment");
    Ok(apt)
}

/// Remove an apartment. Missing IDs are not an error.
pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
    let n = conn.execute("DELETE FROM apartments WHERE id = ?1", [id])?;
    Ok(n > 0)
}

pub fn get(conn: &Connection, id: &str) -> Result<Apartment> {
    conn.query_row(
        "SELECT id, owner, resident, same_flag FROM apartments WHERE id = ?1",
        [id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| AppError::NotFound(format!("apartment {id}")))
}

pub fn list(conn: &Connection) -> Result<Vec<Apartment>> {
    let mut stmt = conn.prepare("SELECT id, owner, resident, same_flag FROM apartments ORDER BY id")?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT count(*) FROM apartments", [], |r| r.get(0))?)
}

pub fn ids(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT id FROM apartments ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
