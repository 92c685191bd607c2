use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::User;

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Validation(format!("could not hash password: {e}")))
}

fn validate(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation("username and password are required".to_string()));
    }
    Ok(())
}

pub fn add_user(conn: &Connection, username: &str, password: &str) -> Result<User> {
    validate(username, password)?;
    let username = username.trim();
    conn.execute(
        "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
        rusqlite::params![username, hash_password(password)?],
    )?;
    info!(username, "user added");
    Ok(User {
        id: conn.last_insert_rowid(),
        username: username.to_string(),
    })
}

pub fn update_user(conn: &Connection, id: i64, username: &str, password: &str) -> Result<()> {
    validate(username, password)?;
    let n = conn.execute(
        "UPDATE users SET username = ?1, password_hash = ?2 WHERE id = ?3",
        rusqlite::params![username.trim(), hash_password(password)?, id],
    )?;
    if n == 0 {
        return Err(AppError::NotFound(format!("user {id}")));
    }
    Ok(())
}

pub fn delete_user(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
    Ok(n > 0)
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, username FROM users ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_users(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT count(*) FROM users", [], |r| r.get(0))?)
}

/// True iff `username` exists and `password` verifies against its stored hash.
pub fn authenticate(conn: &Connection, username: &str, password: &str) -> Result<bool> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT password_hash FROM users WHERE username = ?1",
            [username.trim()],
            |r| r.get(0),
        )
        .optional()?;
    let Some(stored) = stored else {
        debug!(username, "login for unknown user");
        return Ok(false);
    };
    let Ok(parsed) = PasswordHash::new(&stored) else {
        return Ok(false);
    };
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
