mod apartments;
mod cli;
mod codec;
mod collections;
mod db;
mod error;
mod fmt;
mod ledger;
mod models;
mod receipt;
mod settings;
mod transfer;
mod users;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{
    ApartmentsCommands, Cli, CollectionsCommands, Commands, LedgerCommands, StoreCommands, UsersCommands,
};
use db::Stores;
use error::Result;
use settings::{load_settings, Settings};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(settings, data_dir),
        Commands::Store(command) => Stores::open(&settings.data_path())
            .and_then(|mut stores| dispatch(command, &settings, &mut stores)),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn dispatch(command: StoreCommands, settings: &Settings, stores: &mut Stores) -> Result<()> {
    match command {
        StoreCommands::Login { username, password } => cli::users::login(stores, &username, password),
        StoreCommands::Users { command } => match command {
            UsersCommands::Add { username, password } => cli::users::add(stores, &username, password),
            UsersCommands::Update {
                id,
                username,
                password,
            } => cli::users::update(stores, id, &username, password),
            UsersCommands::List => cli::users::list(stores),
            UsersCommands::Delete { id } => cli::users::delete(stores, id),
        },
        StoreCommands::Apartments { command } => match command {
            ApartmentsCommands::Add {
                id,
                owner,
                resident,
                same,
            } => cli::apartments::add(stores, &id, &owner, &resident, same),
            ApartmentsCommands::List { ids_only } => cli::apartments::list(stores, ids_only),
            ApartmentsCommands::Show { id } => cli::apartments::show(stores, &id),
            ApartmentsCommands::Delete { id } => cli::apartments::delete(stores, &id),
            ApartmentsCommands::Import { file } => cli::apartments::import(stores, &file),
            ApartmentsCommands::Export { file } => cli::apartments::export(stores, &file),
        },
        StoreCommands::Collect {
            apartment,
            month,
            collection_type,
            amount,
        } => cli::collect::run(stores, settings, &apartment, &month, &collection_type, amount.as_deref()),
        StoreCommands::Collections { command } => match command {
            CollectionsCommands::List { apartment } => {
                cli::collect::list(stores, settings, apartment.as_deref())
            }
        },
        StoreCommands::Receipt { id } => cli::collect::receipt(stores, settings, id),
        StoreCommands::Ledger { command } => match command {
            LedgerCommands::Add {
                month,
                expense_type,
                amount,
                kind,
            } => cli::ledger::add(stores, settings, &month, &expense_type, &amount, &kind),
            LedgerCommands::Recent { limit } => cli::ledger::recent(stores, settings, limit),
        },
        StoreCommands::Backup { output } => cli::backup::run(stores, settings, output),
        StoreCommands::Status => cli::status::run(stores, settings),
    }
}
