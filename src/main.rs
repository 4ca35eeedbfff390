use log::{info, warn};
use std::sync::Arc;

use caltrack::credentials::credential_provider;
use caltrack::server::{self, AppState};
use caltrack::{GeminiProvider, SheetsStore, TrackerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = TrackerConfig::load()?;

    let api_key = config.configured_api_key().map(str::to_string);
    if api_key.is_none() {
        warn!("No gemini_api_key configured; the form will ask for one");
    }

    let credentials = credential_provider(&config);
    info!("Using {} service account credentials", credentials.source());

    let state = AppState {
        provider: Arc::new(GeminiProvider::new(&config.gemini)?),
        store: Arc::new(SheetsStore::new(config.sheets.clone(), credentials)?),
        api_key,
    };

    server::serve(server::router(state), &config.server).await?;
    Ok(())
}
