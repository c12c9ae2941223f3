use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use clarity_core::backup::validate_app_data;
use clarity_core::store::Action;
use clarity_core::types::{AppData, Project};

use super::{api_error, ApiError};
use crate::state::AppState;

pub async fn get_data(State(state): State<AppState>) -> Json<AppData> {
    Json(state.store().app_data().clone())
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let store = state.store();
    store.app_data().project(&project_id).cloned().map(Json).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            "clarity.api.get_project",
            format!("Project not found: {}", project_id),
        )
    })
}

pub async fn dispatch_action(
    State(state): State<AppState>,
    Json(action): Json<Action>,
) -> Result<Json<AppData>, ApiError> {
    let mut store = state.store();
    let changed = store.dispatch(&action).map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "clarity.api.dispatch",
            format!("Failed to save: {}", e),
        )
    })?;
    if !changed {
        log::debug!(
            target: "clarity.api.dispatch",
            "Action left the document unchanged (project {})",
            action.project_id().unwrap_or("-")
        );
    }
    Ok(Json(store.app_data().clone()))
}

/// Replace the whole document. Rejected before anything is written if ids
/// collide.
pub async fn replace_data(
    State(state): State<AppState>,
    Json(app_data): Json<AppData>,
) -> Result<Json<AppData>, ApiError> {
    validate_app_data(&app_data)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, "clarity.api.replace_data", e.to_string()))?;

    let mut store = state.store();
    store.dispatch(&Action::Replace { app_data }).map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "clarity.api.replace_data",
            format!("Failed to save: {}", e),
        )
    })?;
    Ok(Json(store.app_data().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support;
    use clarity_core::types::{ProjectData, ProjectType};
    use serde_json::json;

    #[tokio::test]
    async fn test_get_data_returns_sample_workspace() {
        let Json(data) = get_data(State(test_support::state())).await;
        assert_eq!(data.projects.len(), 3);
        assert_eq!(data.categories.len(), 2);
    }

    #[tokio::test]
    async fn test_get_project_found_and_missing() {
        let state = test_support::state();
        let Json(project) = get_project(State(state.clone()), Path("proj-3".to_string()))
            .await
            .unwrap();
        assert_eq!(project.name, "Shopping List");

        let (status, Json(body)) = get_project(State(state), Path("nope".to_string()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Project not found: nope");
    }

    #[tokio::test]
    async fn test_dispatch_action_from_json() {
        let state = test_support::state();
        let action: Action = serde_json::from_value(json!({
            "type": "addChecklistItem",
            "projectId": "proj-3",
            "text": "Eggs"
        }))
        .unwrap();

        let Json(data) = dispatch_action(State(state.clone()), Json(action)).await.unwrap();
        match &data.project("proj-3").unwrap().data {
            ProjectData::Checklist(items) => {
                assert_eq!(items.len(), 5);
                assert_eq!(items[4].text, "Eggs");
            }
            other => panic!("expected checklist, got {:?}", other),
        }
        assert_eq!(state.store().app_data(), &data);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_project_is_noop() {
        let state = test_support::state();
        let before = state.store().app_data().clone();
        let action = Action::RenameProject { project_id: "ghost".into(), name: "Boo".into() };
        let Json(after) = dispatch_action(State(state), Json(action)).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_replace_data_rejects_duplicate_ids() {
        let state = test_support::state();
        let mut data = state.store().app_data().clone();
        let dup = data.projects[0].clone();
        data.projects.push(dup);

        let (status, _) = replace_data(State(state.clone()), Json(data)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(state.store().app_data().projects.len(), 3);
    }

    #[tokio::test]
    async fn test_replace_data_swaps_document() {
        let state = test_support::state();
        let fresh = AppData {
            categories: vec![],
            projects: vec![Project {
                id: "only".into(),
                name: "Only".into(),
                category_id: None,
                data: ProjectData::Checklist(vec![]),
                last_modified: 1,
                view_mode: None,
            }],
        };
        let Json(data) = replace_data(State(state), Json(fresh.clone())).await.unwrap();
        assert_eq!(data, fresh);
        assert_eq!(data.projects[0].project_type(), ProjectType::Checklist);
    }

    #[tokio::test]
    async fn test_dispatch_cannot_break_unique_ids() {
        let state = test_support::state();
        let before = state.store().app_data().clone();

        let dup_card: Action = serde_json::from_value(json!({
            "type": "addCard",
            "projectId": "proj-1",
            "columnId": "col-2",
            "cardId": "card-1",
            "title": "dup"
        }))
        .unwrap();
        let Json(after) = dispatch_action(State(state.clone()), Json(dup_card)).await.unwrap();
        assert_eq!(after, before);

        let mut broken = before.clone();
        broken.categories.push(broken.categories[0].clone());
        let Json(after) = dispatch_action(State(state.clone()), Json(Action::Replace { app_data: broken }))
            .await
            .unwrap();
        assert_eq!(after, before);

        let raw = state.store().export_backup().unwrap();
        assert!(clarity_core::backup::import_backup(&raw).is_ok());
    }
}
