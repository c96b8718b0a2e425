mod categorize;
mod config;
mod db;
mod inbox;
mod models;
mod run;
mod sms;
mod store;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let config = config::MonitorConfig::from_env();
    let db_path = get_db_path()?;
    let db = db::Database::open(&db_path)?;

    run::as_cli(&args, &db, &config)
}

fn init_tracing() {
    // RUST_LOG wins, then SPENDBOOK_LOG, then info
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("SPENDBOOK_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn get_db_path() -> Result<std::path::PathBuf> {
    if let Ok(path) = std::env::var("SPENDBOOK_DB") {
        return Ok(std::path::PathBuf::from(path));
    }

    let proj_dirs = directories::ProjectDirs::from("com", "spendbook", "Spendbook")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("spendbook.db"))
}
