/// JSON backup files: the whole document plus settings, exported and imported
/// as one unit. An import is all-or-nothing.
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::UserSettings;
use crate::types::{AppData, ProjectData};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupFile {
    pub app_data: AppData,
    pub user_settings: UserSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("Error reading or parsing the backup file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid backup file format: missing {0}")]
    MissingSection(&'static str),

    #[error("Invalid backup file format: duplicate {kind} id {id:?}")]
    DuplicateId { kind: &'static str, id: String },
}

/// Pretty-printed backup of `app_data` and `user_settings`.
pub fn export_backup(app_data: &AppData, user_settings: &UserSettings) -> Result<String, BackupError> {
    let file = BackupFile {
        app_data: app_data.clone(),
        user_settings: user_settings.clone(),
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Parse and validate a backup. Nothing is applied here; the caller swaps
/// both halves in only after this returns `Ok`.
pub fn import_backup(raw: &str) -> Result<BackupFile, BackupError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    for section in ["appData", "userSettings"] {
        if value.get(section).map_or(true, |v| v.is_null()) {
            return Err(BackupError::MissingSection(section));
        }
    }
    let file: BackupFile = serde_json::from_value(value)?;
    validate_app_data(&file.app_data)?;
    Ok(file)
}

/// Reject documents whose ids collide inside the same collection.
pub fn validate_app_data(app_data: &AppData) -> Result<(), BackupError> {
    ensure_unique("category", app_data.categories.iter().map(|c| c.id.as_str()))?;
    ensure_unique("project", app_data.projects.iter().map(|p| p.id.as_str()))?;
    for project in &app_data.projects {
        match &project.data {
            ProjectData::Board(columns) => {
                ensure_unique("column", columns.iter().map(|c| c.id.as_str()))?;
                ensure_unique(
                    "card",
                    columns.iter().flat_map(|c| c.cards.iter()).map(|c| c.id.as_str()),
                )?;
            }
            ProjectData::Checklist(items) => {
                ensure_unique("checklist item", items.iter().map(|i| i.id.as_str()))?;
            }
            ProjectData::Note(_) => {}
        }
    }
    Ok(())
}

fn ensure_unique<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> Result<(), BackupError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(BackupError::DuplicateId { kind, id: id.to_string() });
        }
    }
    Ok(())
}

/// Suggested download name, e.g. `clarity-board-backup-2024-05-01.json`.
pub fn backup_file_name(at: DateTime<Utc>) -> String {
    format!("clarity-board-backup-{}.json", at.format("%Y-%m-%d"))
}
