#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use unbox_buddy::{
    bot,
    config::{catalog::load_catalog, settings::load_default_config},
    core::economy::Economy,
    errors::{Error, Result},
    store::JsonFileStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration and the case catalog
    let app_config = load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    let catalog = load_catalog(&app_config.storage.catalog_path)
        .inspect_err(|e| error!("Failed to load case catalog: {}", e))?;
    if catalog.is_empty() {
        info!("No cases configured; /case open will reject every request.");
    }

    // 4. Load economy data from the JSON files (migrating legacy layouts)
    let store = Arc::new(JsonFileStore::new(&app_config.storage.data_dir));
    let economy = Economy::open(app_config, catalog, store)
        .inspect(|_| info!("Economy data loaded successfully."))
        .inspect_err(|e| error!("Failed to load economy data: {}", e))?;

    // 5. Run the bot
    // DISCORD_BOT_TOKEN is read directly before use, not stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, Arc::new(economy)).await
}
