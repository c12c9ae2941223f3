use axum::{extract::State, response::Json};

use crate::state::AppState;

pub async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = state.store();
    let settings = store.settings();
    Json(serde_json::json!({
        "status": "running",
        "port": state.port,
        "bind_address": state.bind_address,
        "workspace": { "name": settings.display_name(), "initials": settings.initials() },
        "projects": store.app_data().projects.len(),
        "hasOnboarded": store.has_onboarded(),
        "lastBackup": store.last_backup(),
        "aiConfigured": state.ai.is_configured(),
    }))
}
