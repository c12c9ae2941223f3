use axum::{
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{any, get, post},
    Router,
};
use serde::Serialize;

mod ai;
mod data;
mod search;
mod settings;
mod status;

use crate::state::AppState;

/// Axum REST API routes.
///
///   GET  /data                                -> the whole document
///   PUT  /data                                -> replace the document (validated)
///   POST /actions                             -> dispatch one action, returns the document
///   GET  /projects/:projectId                 -> one project
///   GET  /search?q=term                       -> search projects, cards, notes and items
///   GET  /dashboard                           -> totals, recent projects, category counts
///   GET  /settings                            -> user settings
///   PUT  /settings                            -> replace user settings
///   GET  /backup                              -> download a backup file
///   POST /backup                              -> import a backup file
///   POST /reset                               -> restore the sample workspace
///   POST /onboarded                           -> mark onboarding as done
///   POST /start-fresh                         -> empty workspace, onboarding done
///   ANY  /ai                                  -> AI proxy (POST only, others get 405)
///   POST /smart-split                         -> generate a board project from text
///   POST /projects/:projectId/cards/:cardId/enhance -> rewrite a card description
///   GET  /status                              -> health check
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/data", get(data::get_data).put(data::replace_data))
        .route("/actions", post(data::dispatch_action))
        .route("/projects/{project_id}", get(data::get_project))
        .route("/search", get(search::search))
        .route("/dashboard", get(search::dashboard))
        .route("/settings", get(settings::get_settings).put(settings::put_settings))
        .route("/backup", get(settings::export_backup).post(settings::import_backup))
        .route("/reset", post(settings::reset))
        .route("/onboarded", post(settings::mark_onboarded))
        .route("/start-fresh", post(settings::start_fresh))
        .route("/ai", any(ai::proxy))
        .route("/smart-split", post(ai::smart_split))
        .route(
            "/projects/{project_id}/cards/{card_id}/enhance",
            post(ai::enhance_card),
        )
        .route("/status", get(status::status))
}

// ── Shared types and helpers used across sub-modules ────────────────────

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, target: &'static str, error: impl Into<String>) -> ApiError {
    let error = error.into();
    log_api_issue(status, target, &error);
    (status, Json(ErrorResponse { error }))
}

fn insert_header_safe(headers: &mut HeaderMap, name: &'static str, value: &str) {
    match value.parse() {
        Ok(parsed) => {
            headers.insert(name, parsed);
        }
        Err(e) => {
            log::warn!("Failed to set header {}={} ({})", name, value, e);
        }
    }
}

fn log_api_issue(status: StatusCode, target: &'static str, message: impl AsRef<str>) {
    let message = message.as_ref();
    if status.is_server_error() {
        log::error!(target: target, "{}", message);
    } else {
        log::warn!(target: target, "{}", message);
    }
}
