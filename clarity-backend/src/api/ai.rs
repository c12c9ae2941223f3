use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode},
    response::Json,
};
use clarity_core::proxy::{card_enhance_input, smart_split_project, EnhanceOption, ProxyRequest};
use clarity_core::store::Action;
use clarity_core::types::{timestamp_millis, Project};
use serde::Deserialize;

use super::{api_error, ApiError};
use crate::ai::AiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SmartSplitBody {
    text: String,
}

#[derive(Deserialize)]
pub struct EnhanceCardBody {
    option: EnhanceOption,
}

fn ai_error(target: &'static str, e: AiError) -> ApiError {
    api_error(e.status(), target, e.to_string())
}

fn save_error(target: &'static str, e: impl std::fmt::Display) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, target, format!("Failed to save: {}", e))
}

/// The proxy endpoint. The key check comes before the body is looked at, so
/// an unconfigured server answers the same way to every POST.
pub async fn proxy(
    method: Method,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    if method != Method::POST {
        return Err(ai_error("clarity.api.ai", AiError::MethodNotAllowed));
    }
    if !state.ai.is_configured() {
        return Err(ai_error("clarity.api.ai", AiError::NotConfigured));
    }
    let request = ProxyRequest::parse(&body).map_err(|e| ai_error("clarity.api.ai", e.into()))?;
    let response = state
        .ai
        .handle(&request)
        .await
        .map_err(|e| ai_error("clarity.api.ai", e))?;
    Ok(Json(response))
}

/// Turn free text into a new board project and add it to the document.
pub async fn smart_split(
    State(state): State<AppState>,
    Json(body): Json<SmartSplitBody>,
) -> Result<Json<Project>, ApiError> {
    let text = body.text.trim();
    if text.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "clarity.api.smart_split",
            "Text is required.",
        ));
    }

    let answer = state
        .ai
        .generate_project(text)
        .await
        .map_err(|e| ai_error("clarity.api.smart_split", e))?;
    let project = smart_split_project(&answer, timestamp_millis());
    log::info!(
        target: "clarity.api.smart_split",
        "Generated '{}' with {} tasks",
        project.name,
        answer.tasks.len()
    );

    state
        .store()
        .dispatch(&Action::AddProject { project: project.clone() })
        .map_err(|e| save_error("clarity.api.smart_split", e))?;
    Ok(Json(project))
}

/// Replace a card's description with the model's rewrite of it.
pub async fn enhance_card(
    State(state): State<AppState>,
    Path((project_id, card_id)): Path<(String, String)>,
    Json(body): Json<EnhanceCardBody>,
) -> Result<Json<Project>, ApiError> {
    let input = {
        let store = state.store();
        store
            .app_data()
            .project(&project_id)
            .and_then(|p| p.columns())
            .and_then(|cols| cols.iter().flat_map(|c| &c.cards).find(|c| c.id == card_id))
            .map(|card| card_enhance_input(card).to_string())
            .ok_or_else(|| {
                api_error(
                    StatusCode::NOT_FOUND,
                    "clarity.api.enhance",
                    format!("Card not found: {}/{}", project_id, card_id),
                )
            })?
    };

    let description = state
        .ai
        .enhance_text(body.option, &input)
        .await
        .map_err(|e| ai_error("clarity.api.enhance", e))?;

    let mut store = state.store();
    store
        .dispatch(&Action::SetCardDescription {
            project_id: project_id.clone(),
            card_id,
            description,
        })
        .map_err(|e| save_error("clarity.api.enhance", e))?;
    // The card may have been deleted while the model was answering.
    store.app_data().project(&project_id).cloned().map(Json).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            "clarity.api.enhance",
            format!("Project not found: {}", project_id),
        )
    })
}
