/// Clarity backend: config loading, storage init, AI client, HTTP server.
pub mod ai;
pub mod api;
pub mod config;
mod logging;
mod server;
pub mod state;

use crate::ai::AiClient;
use crate::config::BackendConfig;
use crate::state::AppState;
use clarity_core::storage::{DocumentStorage, LocalStorage, StorageError};
use clarity_core::store::Store;

/// Open the document store in the configured data dir and wire up the state
/// the handlers share.
pub fn build_state(config: &BackendConfig) -> Result<AppState, StorageError> {
    let local = LocalStorage::open(config.resolved_data_dir())?;
    log::info!(target: "clarity.backend", "Documents stored in {}", local.dir().display());
    let storage: Box<dyn DocumentStorage> = Box::new(local);
    let store = Store::load(storage);
    let ai = AiClient::from_env(&config.ai);
    Ok(AppState::new(store, ai, config.port, config.bind_address.clone()))
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = logging::init() {
        logging::write_fallback_line(&format!("failed to initialize backend logger: {}", e));
    }

    let config_path = config::default_config_path();
    let config = config::load_config(&config_path);
    let state = build_state(&config)?;

    let port = server::spawn_server(state).await?;
    log::info!("Server started on port {}", port);

    tokio::signal::ctrl_c().await?;
    log::info!("Shutting down");
    Ok(())
}
