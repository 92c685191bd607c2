pub mod apartments;
pub mod backup;
pub mod collect;
pub mod init;
pub mod ledger;
pub mod status;
pub mod users;

use clap::{Parser, Subcommand};
use zeroize::Zeroize;

use crate::error::Result;

/// Use the password given on the command line, or ask for it without echo.
pub(crate) fn password_or_prompt(given: Option<String>, prompt: &str) -> Result<String> {
    match given {
        Some(p) => Ok(p),
        None => Ok(rpassword::prompt_password(prompt)?),
    }
}

/// Run `f` with the password, then wipe it from memory.
pub(crate) fn with_password<T>(
    given: Option<String>,
    prompt: &str,
    f: impl FnOnce(&str) -> Result<T>,
) -> Result<T> {
    let mut password = password_or_prompt(given, prompt)?;
    let result = f(&password);
    password.zeroize();
    result
}

#[derive(Parser)]
#[command(name = "aptkeeper", about = "Apartments, maintenance collections, receipts and ledger for a small residential property.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and create the databases.
    Init {
        /// Path for data (default: ~/Documents/aptkeeper)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    #[command(flatten)]
    Store(StoreCommands),
}

/// Commands that run against the opened databases.
#[derive(Subcommand)]
pub enum StoreCommands {
    /// Check a username and password.
    Login {
        username: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Manage login users.
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
    /// Manage apartments.
    Apartments {
        #[command(subcommand)]
        command: ApartmentsCommands,
    },
    /// Record a collection for an apartment and generate its PDF receipt.
    Collect {
        /// Apartment ID
        apartment: String,
        /// Month name, e.g. January
        #[arg(long)]
        month: String,
        /// Collection type: Maintenance or Other
        #[arg(long = "type", default_value = "Maintenance")]
        collection_type: String,
        /// Amount (default: configured maintenance fee)
        #[arg(long)]
        amount: Option<String>,
    },
    /// Browse recorded collections.
    Collections {
        #[command(subcommand)]
        command: CollectionsCommands,
    },
    /// Write the PDF receipt for a recorded collection again.
    Receipt {
        /// Collection ID (receipt number)
        id: i64,
    },
    /// Record and review expense/income entries.
    Ledger {
        #[command(subcommand)]
        command: LedgerCommands,
    },
    /// Snapshot both databases into a new directory.
    Backup {
        /// Output directory (default: <data_dir>/backups/YYYYMMDD-HHMMSS)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show current data directory and summary counts.
    Status,
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Add a login user.
    Add {
        username: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Change a user's name and password.
    Update {
        id: i64,
        username: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// List users.
    List,
    /// Delete a user by ID.
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ApartmentsCommands {
    /// Add or replace an apartment.
    Add {
        /// Apartment ID, e.g. unit number
        id: String,
        #[arg(long)]
        owner: String,
        /// Resident name (blank means Vacant)
        #[arg(long, default_value = "")]
        resident: String,
        /// Owner lives in the apartment
        #[arg(long, conflicts_with = "resident")]
        same: bool,
    },
    /// List all apartments.
    List {
        /// Print only the IDs, one per line
        #[arg(long = "ids-only")]
        ids_only: bool,
    },
    /// Show one apartment.
    Show { id: String },
    /// Delete an apartment by ID.
    Delete { id: String },
    /// Import apartments from a .csv or .xlsx file (all rows or none).
    Import { file: String },
    /// Export apartments to a .csv or .xlsx file.
    Export { file: String },
}

#[derive(Subcommand)]
pub enum CollectionsCommands {
    /// List collections, newest first.
    List {
        /// Only this apartment
        #[arg(long)]
        apartment: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum LedgerCommands {
    /// Record a payment or receipt of money.
    Add {
        /// Month name, e.g. January
        #[arg(long)]
        month: String,
        /// Expense type: Security Service, Cleaning Services, Utilities, Repairs
        #[arg(long = "type")]
        expense_type: String,
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        /// Debit (money paid) or Credit (money received)
        #[arg(long)]
        kind: String,
    },
    /// Show the most recent entries.
    Recent {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}
