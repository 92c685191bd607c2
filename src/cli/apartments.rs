use std::path::PathBuf;

use comfy_table::{Cell, Table};

use crate::apartments;
use crate::db::Stores;
use crate::error::Result;
use crate::models::Apartment;
use crate::transfer;

pub fn add(stores: &Stores, id: &str, owner: &str, resident: &str, same: bool) -> Result<()> {
    let resident = if same { owner } else { resident };
    let apt = apartments::upsert(&stores.records, &Apartment::new(id, owner, resident))?;
    println!("Saved apartment {}: {} - {}", apt.id, apt.owner, apt.resident);
    Ok(())
}

pub fn list(stores: &Stores, ids_only: bool) -> Result<()> {
    if ids_only {
        for id in apartments::ids(&stores.records)? {
            println!("{id}");
        }
        return Ok(());
    }
    let rows = apartments::list(&stores.records)?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Owner", "Resident", "Owner Resides"]);
    for apt in &rows {
        table.add_row(vec![
            Cell::new(&apt.id),
            Cell::new(&apt.owner),
            Cell::new(&apt.resident),
            Cell::new(if apt.same_flag { "yes" } else { "" }),
        ]);
    }
    println!("Apartments ({})\n{table}", rows.len());
    Ok(())
}

pub fn show(stores: &Stores, id: &str) -> Result<()> {
    let apt = apartments::get(&stores.records, id)?;
    println!("Apartment: {}", apt.id);
    println!("Owner:     {}", apt.owner);
    println!("Resident:  {}", apt.resident);
    println!("Same:      {}", apt.same_flag);
    Ok(())
}

pub fn delete(stores: &Stores, id: &str) -> Result<()> {
    if apartments::delete(&stores.records, id)? {
        println!("Deleted apartment {id}");
    } else {
        println!("No apartment with ID {id}");
    }
    Ok(())
}

pub fn import(stores: &mut Stores, file: &str) -> Result<()> {
    let n = transfer::import_apartments(&mut stores.records, &PathBuf::from(file))?;
    println!("{n} apartments imported");
    Ok(())
}

pub fn export(stores: &Stores, file: &str) -> Result<()> {
    let path = PathBuf::from(file);
    let n = transfer::export_apartments(&stores.records, &path)?;
    println!("{n} apartments exported to {}", path.display());
    Ok(())
}
