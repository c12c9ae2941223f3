use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use clarity_core::backup::backup_file_name;
use clarity_core::config::UserSettings;
use clarity_core::store::StoreError;

use super::{api_error, insert_header_safe, ApiError};
use crate::state::AppState;

pub async fn get_settings(State(state): State<AppState>) -> Json<UserSettings> {
    Json(state.store().settings().clone())
}

pub async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<UserSettings>,
) -> Result<Json<UserSettings>, ApiError> {
    let mut store = state.store();
    store.set_settings(settings).map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "clarity.api.settings",
            format!("Failed to save settings: {}", e),
        )
    })?;
    Ok(Json(store.settings().clone()))
}

/// Download the backup as an attachment and record the time it was taken.
pub async fn export_backup(
    State(state): State<AppState>,
) -> Result<(HeaderMap, String), ApiError> {
    let raw = state.store().export_backup().map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "clarity.api.backup",
            format!("Failed to export backup: {}", e),
        )
    })?;

    let file_name = backup_file_name(chrono::Utc::now());
    let mut headers = HeaderMap::new();
    insert_header_safe(&mut headers, "content-type", "application/json");
    insert_header_safe(
        &mut headers,
        "content-disposition",
        &format!("attachment; filename=\"{}\"", file_name),
    );
    log::info!(target: "clarity.api.backup", "Exported backup {}", file_name);
    Ok((headers, raw))
}

/// Import a backup file. Nothing is replaced unless the whole file validates.
pub async fn import_backup(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut store = state.store();
    store.import_backup(&body).map_err(|e| match e {
        StoreError::Backup(e) => api_error(StatusCode::BAD_REQUEST, "clarity.api.backup", e.to_string()),
        StoreError::Storage(e) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "clarity.api.backup",
            format!("Failed to save imported data: {}", e),
        ),
    })?;
    Ok(Json(serde_json::json!({
        "success": true,
        "projects": store.app_data().projects.len(),
    })))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state.store().reset().map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "clarity.api.reset",
            format!("Failed to reset: {}", e),
        )
    })?;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn mark_onboarded(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store().set_onboarded(true).map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "clarity.api.onboarded",
            format!("Failed to save: {}", e),
        )
    })?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Skip the sample workspace. Leaves settings and the backup time alone.
pub async fn start_fresh(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state.store().start_fresh().map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "clarity.api.start_fresh",
            format!("Failed to start fresh: {}", e),
        )
    })?;
    Ok(Json(serde_json::json!({ "success": true })))
}
