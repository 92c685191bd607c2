use crate::db::Stores;
use crate::error::Result;
use crate::settings::{save_settings, shellexpand_path, Settings};

pub fn run(mut settings: Settings, data_dir: Option<String>) -> Result<()> {
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    save_settings(&settings)?;

    let resolved = settings.data_path();
    Stores::open(&resolved)?;
    std::fs::create_dir_all(settings.receipts_path())?;

    println!("Initialized aptkeeper at {}", resolved.display());
    println!("Receipts go to {}", settings.receipts_path().display());
    Ok(())
}
