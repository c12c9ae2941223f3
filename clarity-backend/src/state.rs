/// Shared application state passed to axum handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use clarity_core::storage::DocumentStorage;
use clarity_core::store::Store;

use crate::ai::AiClient;

pub type SharedStore = Store<Box<dyn DocumentStorage>>;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<SharedStore>>,
    pub ai: Arc<AiClient>,
    pub port: u16,
    pub bind_address: String,
}

impl AppState {
    pub fn new(store: SharedStore, ai: AiClient, port: u16, bind_address: impl Into<String>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            ai: Arc::new(ai),
            port,
            bind_address: bind_address.into(),
        }
    }

    /// Lock the store. Never hold the guard across an `.await`.
    pub fn store(&self) -> MutexGuard<'_, SharedStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }
}
