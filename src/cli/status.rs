use crate::db::{Stores, RECORDS_DB, USERS_DB};
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::Settings;
use crate::{apartments, users};

pub fn run(stores: &Stores, settings: &Settings) -> Result<()> {
    let data_dir = settings.data_path();
    println!("Data dir:   {}", data_dir.display());
    println!("Receipts:   {}", settings.receipts_path().display());
    for name in [USERS_DB, RECORDS_DB] {
        let size = std::fs::metadata(data_dir.join(name)).map(|m| m.len()).unwrap_or(0);
        println!("{:<11} {}", format!("{name}:"), format_bytes(size));
    }

    let conn = &stores.records;
    let collections: i64 = conn.query_row("SELECT count(*) FROM collections", [], |r| r.get(0))?;
    let payments: i64 = conn.query_row("SELECT count(*) FROM payments", [], |r| r.get(0))?;

    println!();
    println!("Users:         {}", users::count_users(&stores.users)?);
    println!("Apartments:    {}", apartments::count(conn)?);
    println!("Collections:   {collections}");
    println!("Ledger rows:   {payments}");
    Ok(())
}
