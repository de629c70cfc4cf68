// rest_api/src/main.rs

use anyhow::Context;
use dotenv::dotenv;
use rest_api::{load_intake_config, start_server, SheetBackend};
use sheets::{GoogleSheetsStore, InMemoryRowStore, RowStore};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt().init();

    let config_path = std::env::var("INTAKE_CONFIG").ok().map(PathBuf::from);
    let config = load_intake_config(config_path).context("Failed to load intake configuration")?;

    let backend = SheetBackend::from_str(&config.backend)?;
    let store: Arc<dyn RowStore> = match backend {
        SheetBackend::Memory => {
            info!("using the in-memory row store");
            Arc::new(InMemoryRowStore::new())
        }
        SheetBackend::Google => {
            let sheet_config = config
                .sheet
                .clone()
                .context("The google backend requires a 'sheet' section in the intake config")?;
            let store = GoogleSheetsStore::new(&sheet_config)?;
            store
                .ensure_header()
                .await
                .context("Failed to prepare the spreadsheet header")?;
            info!(spreadsheet = %sheet_config.spreadsheet_id, "using the Google Sheets row store");
            Arc::new(store)
        }
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, shutting down.");
            let _ = shutdown_tx.send(());
        }
    });

    start_server(&config, store, shutdown_rx).await
}
