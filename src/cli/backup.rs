use std::path::PathBuf;

use crate::db::{self, Stores};
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::Settings;

pub fn run(stores: &Stores, settings: &Settings, output: Option<String>) -> Result<()> {
    let dest_dir = match output {
        Some(p) => PathBuf::from(p),
        None => {
            let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
            settings.data_path().join("backups").join(stamp.to_string())
        }
    };

    let written = db::backup_stores(stores, &dest_dir)?;
    println!("Backup saved to {}", dest_dir.display());
    for path in written {
        let size = std::fs::metadata(&path)?.len();
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        println!("  {name:<11} {}", format_bytes(size));
    }
    Ok(())
}
