use anyhow::Result;
use std::path::PathBuf;
use tailsift_core::conf::TailsiftConfig;

pub fn check(path: PathBuf) -> Result<()> {
    let cfg = TailsiftConfig::from_file(&path)?;

    println!("✔ Config loaded successfully");
    println!("✔ {} log paths", cfg.ingest.log_paths.len());
    println!("✔ {} signature files", cfg.bots.signature_files.len());
    match &cfg.geoip.db_path {
        Some(db) => println!("✔ geoip database {}", db.display()),
        None => println!("✔ geoip disabled"),
    }
    println!("✔ store {}", cfg.store.path.display());

    Ok(())
}
