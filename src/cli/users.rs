use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::with_password;
use crate::db::Stores;
use crate::error::{AppError, Result};
use crate::users;

pub fn login(stores: &Stores, username: &str, password: Option<String>) -> Result<()> {
    let ok = with_password(password, "Password: ", |pw| {
        users::authenticate(&stores.users, username, pw)
    })?;
    if ok {
        println!("{} Welcome, {username}.", "Logged in.".green().bold());
        Ok(())
    } else {
        Err(AppError::Validation("invalid credentials".to_string()))
    }
}

pub fn add(stores: &Stores, username: &str, password: Option<String>) -> Result<()> {
    let user = with_password(password, "Password for new user: ", |pw| {
        users::add_user(&stores.users, username, pw)
    })?;
    println!("Added user {} (ID {})", user.username, user.id);
    Ok(())
}

pub fn update(stores: &Stores, id: i64, username: &str, password: Option<String>) -> Result<()> {
    with_password(password, "New password: ", |pw| {
        users::update_user(&stores.users, id, username, pw)
    })?;
    println!("Updated user {id}");
    Ok(())
}

pub fn list(stores: &Stores) -> Result<()> {
    let rows = users::list_users(&stores.users)?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Username"]);
    for user in rows {
        table.add_row(vec![Cell::new(user.id), Cell::new(user.username)]);
    }
    println!("Users\n{table}");
    Ok(())
}

pub fn delete(stores: &Stores, id: i64) -> Result<()> {
    if users::delete_user(&stores.users, id)? {
        println!("Deleted user {id}");
    } else {
        println!("No user with ID {id}");
    }
    Ok(())
}
