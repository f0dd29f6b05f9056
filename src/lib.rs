pub mod clock;
pub mod db;
pub mod error;
pub mod export;
pub mod i18n;
pub mod models;
pub mod settings;
pub mod store;
pub mod timer;
pub mod tui;
pub mod utils;

use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use log::info;

use clock::SystemClock;
use db::Database;
use settings::SettingsStore;
use store::SessionStore;
use timer::FloorController;

fn data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("floorclock"))
        .ok_or_else(|| anyhow!("no data directory for this platform"))
}

pub fn run() -> Result<()> {
    let data_dir = data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    utils::logging::init_file_logging(&data_dir.join("floorclock.log"))?;
    info!("FloorClock starting up...");

    let settings_store = SettingsStore::new(data_dir.join("settings.json"))?;
    settings_store.ensure_file()?;
    info!("Settings loaded from {}", settings_store.path().display());
    let settings = settings_store.settings();
    let export_dir = settings_store.export_dir(&data_dir);

    let database = Database::new(data_dir.join("floorclock.sqlite3"))?;
    let store = SessionStore::new(database);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let controller = runtime.block_on(async {
        let controller = FloorController::load(store, Arc::new(SystemClock), &settings).await;
        controller.start_ticker().await;
        controller
    });

    let ui_result = tui::run(runtime.handle(), &controller, &export_dir);
    let shutdown_result = runtime.block_on(controller.shutdown());
    info!("FloorClock stopped");

    ui_result.and(shutdown_result)
}
