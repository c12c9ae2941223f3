/// The application store: every mutation is an [`Action`] run through the
/// pure [`reduce`] function, and [`Store`] persists the result.
///
/// Actions carry every id they need. Constructors and JSON defaults mint
/// fresh ids, so replaying the same action always yields the same document.
use serde::{Deserialize, Serialize};

use crate::backup::{self, BackupError};
use crate::board;
use crate::checklist;
use crate::config::UserSettings;
use crate::defaults;
use crate::drag::{self, DragCommit};
use crate::storage::{self, DocumentStorage, StorageError, StorageKey};
use crate::types::{
    new_id, timestamp_millis, AppData, Card, Category, ChecklistItem, Column, NoteData, Priority, Project,
    ProjectData, ProjectType, ViewMode,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    // Projects
    CreateProject {
        #[serde(default = "new_id")]
        id: String,
        name: String,
        project_type: ProjectType,
        #[serde(default)]
        category_id: Option<String>,
    },
    RenameProject { project_id: String, name: String },
    DeleteProject { project_id: String },
    SetProjectCategory { project_id: String, category_id: Option<String> },
    SetViewMode { project_id: String, view_mode: ViewMode },

    // Categories
    CreateCategory {
        #[serde(default = "new_id")]
        id: String,
        name: String,
    },
    RenameCategory { category_id: String, name: String },
    SetCategoryColor { category_id: String, color: String },
    DeleteCategory { category_id: String },

    // Boards
    AddColumn {
        project_id: String,
        #[serde(default = "new_id")]
        column_id: String,
        #[serde(default)]
        title: Option<String>,
    },
    RenameColumn { project_id: String, column_id: String, title: String },
    DeleteColumn { project_id: String, column_id: String },
    MoveColumn { project_id: String, from: usize, to: usize },
    AddCard {
        project_id: String,
        column_id: String,
        #[serde(default = "new_id")]
        card_id: String,
        title: String,
        #[serde(default)]
        description: String,
    },
    UpdateCard { project_id: String, card_id: String, title: String, description: String },
    SetCardDescription { project_id: String, card_id: String, description: String },
    DeleteCard { project_id: String, card_id: String },
    MoveCard {
        project_id: String,
        card_id: String,
        to_column_id: String,
        #[serde(default)]
        to_index: Option<usize>,
    },
    ReorderCard { project_id: String, column_id: String, from: usize, to: usize },
    CommitDrag { project_id: String, commit: DragCommit },

    // Notes
    UpdateNote { project_id: String, content: String },

    // Checklists
    AddChecklistItem {
        project_id: String,
        #[serde(default = "new_id")]
        item_id: String,
        text: String,
    },
    ToggleChecklistItem { project_id: String, item_id: String },
    UpdateChecklistItem { project_id: String, item_id: String, text: String },
    SetItemPriority { project_id: String, item_id: String, priority: Priority },
    CycleItemPriority { project_id: String, item_id: String },
    DeleteChecklistItem { project_id: String, item_id: String },
    MoveChecklistItem { project_id: String, from: usize, to: usize },

    // Whole document
    AddProject { project: Project },
    Replace { app_data: AppData },
}

impl Action {
    pub fn create_project(name: &str, project_type: ProjectType, category_id: Option<String>) -> Self {
        Action::CreateProject {
            id: new_id(),
            name: name.to_string(),
            project_type,
            category_id,
        }
    }

    pub fn create_category(name: &str) -> Self {
        Action::CreateCategory { id: new_id(), name: name.to_string() }
    }

    pub fn add_column(project_id: &str, title: Option<&str>) -> Self {
        Action::AddColumn {
            project_id: project_id.to_string(),
            column_id: new_id(),
            title: title.map(str::to_string),
        }
    }

    pub fn add_card(project_id: &str, column_id: &str, title: &str, description: &str) -> Self {
        Action::AddCard {
            project_id: project_id.to_string(),
            column_id: column_id.to_string(),
            card_id: new_id(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn add_checklist_item(project_id: &str, text: &str) -> Self {
        Action::AddChecklistItem {
            project_id: project_id.to_string(),
            item_id: new_id(),
            text: text.to_string(),
        }
    }

    /// Project the action targets, if it targets exactly one.
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Action::CreateProject { id, .. } => Some(id.as_str()),
            Action::RenameProject { project_id, .. }
            | Action::DeleteProject { project_id }
            | Action::SetProjectCategory { project_id, .. }
            | Action::SetViewMode { project_id, .. }
            | Action::AddColumn { project_id, .. }
            | Action::RenameColumn { project_id, .. }
            | Action::DeleteColumn { project_id, .. }
            | Action::MoveColumn { project_id, .. }
            | Action::AddCard { project_id, .. }
            | Action::UpdateCard { project_id, .. }
            | Action::SetCardDescription { project_id, .. }
            | Action::DeleteCard { project_id, .. }
            | Action::MoveCard { project_id, .. }
            | Action::ReorderCard { project_id, .. }
            | Action::CommitDrag { project_id, .. }
            | Action::UpdateNote { project_id, .. }
            | Action::AddChecklistItem { project_id, .. }
            | Action::ToggleChecklistItem { project_id, .. }
            | Action::UpdateChecklistItem { project_id, .. }
            | Action::SetItemPriority { project_id, .. }
            | Action::CycleItemPriority { project_id, .. }
            | Action::DeleteChecklistItem { project_id, .. }
            | Action::MoveChecklistItem { project_id, .. } => Some(project_id.as_str()),
            Action::AddProject { project } => Some(project.id.as_str()),
            _ => None,
        }
    }
}

/// Apply `update` to one project. The project is stamped with `now_ms` only
/// if the update actually changed it; an unknown id returns the state as is.
fn update_project(
    state: &AppData,
    project_id: &str,
    now_ms: i64,
    update: impl FnOnce(&Project) -> Project,
) -> AppData {
    let Some(idx) = state.projects.iter().position(|p| p.id == project_id) else {
        log::debug!("[clarity.store] project {} not found, ignoring", project_id);
        return state.clone();
    };
    let current = &state.projects[idx];
    let mut next = update(current);
    if next == *current {
        return state.clone();
    }
    next.last_modified = now_ms;

    let mut out = state.clone();
    out.projects[idx] = next;
    out
}

fn update_board(
    state: &AppData,
    project_id: &str,
    now_ms: i64,
    update: impl FnOnce(&Project, &[Column]) -> Vec<Column>,
) -> AppData {
    update_project(state, project_id, now_ms, |project| match &project.data {
        ProjectData::Board(columns) => Project {
            data: ProjectData::Board(update(project, columns)),
            ..project.clone()
        },
        _ => project.clone(),
    })
}

fn update_checklist(
    state: &AppData,
    project_id: &str,
    now_ms: i64,
    update: impl FnOnce(&[ChecklistItem]) -> Vec<ChecklistItem>,
) -> AppData {
    update_project(state, project_id, now_ms, |project| match &project.data {
        ProjectData::Checklist(items) => Project {
            data: ProjectData::Checklist(update(items)),
            ..project.clone()
        },
        _ => project.clone(),
    })
}

fn update_category(state: &AppData, category_id: &str, update: impl FnOnce(&Category) -> Category) -> AppData {
    let mut out = state.clone();
    if let Some(category) = out.categories.iter_mut().find(|c| c.id == category_id) {
        *category = update(category);
    }
    out
}

/// Pure reducer: the next document after `action`, stamped with `now_ms`.
pub fn reduce(state: &AppData, action: &Action, now_ms: i64) -> AppData {
    match action {
        Action::CreateProject { id, name, project_type, category_id } => {
            let name = name.trim();
            if name.is_empty() || state.project(id).is_some() {
                return state.clone();
            }
            let (data, view_mode) = defaults::new_project_data(name, *project_type);
            let mut out = state.clone();
            out.projects.push(Project {
                id: id.clone(),
                name: name.to_string(),
                category_id: category_id.clone(),
                data,
                last_modified: now_ms,
                view_mode,
            });
            out
        }
        Action::RenameProject { project_id, name } => {
            let name = name.trim();
            if name.is_empty() {
                return state.clone();
            }
            update_project(state, project_id, now_ms, |p| Project { name: name.to_string(), ..p.clone() })
        }
        Action::DeleteProject { project_id } => AppData {
            categories: state.categories.clone(),
            projects: state.projects.iter().filter(|p| &p.id != project_id).cloned().collect(),
        },
        Action::SetProjectCategory { project_id, category_id } => {
            update_project(state, project_id, now_ms, |p| Project {
                category_id: category_id.clone(),
                ..p.clone()
            })
        }
        Action::SetViewMode { project_id, view_mode } => {
            update_project(state, project_id, now_ms, |p| match p.data {
                ProjectData::Board(_) => Project { view_mode: Some(*view_mode), ..p.clone() },
                _ => p.clone(),
            })
        }

        Action::CreateCategory { id, name } => {
            let name = name.trim();
            if name.is_empty() || state.categories.iter().any(|c| &c.id == id) {
                return state.clone();
            }
            let mut out = state.clone();
            out.categories.push(Category { id: id.clone(), ..Category::new(name) });
            out
        }
        Action::RenameCategory { category_id, name } => {
            let name = name.trim();
            if name.is_empty() {
                return state.clone();
            }
            update_category(state, category_id, |c| Category { name: name.to_string(), ..c.clone() })
        }
        Action::SetCategoryColor { category_id, color } => {
            update_category(state, category_id, |c| Category { color: color.clone(), ..c.clone() })
        }
        Action::DeleteCategory { category_id } => AppData {
            categories: state.categories.iter().filter(|c| &c.id != category_id).cloned().collect(),
            projects: state.projects.clone(),
        },

        Action::AddColumn { project_id, column_id, title } => {
            update_board(state, project_id, now_ms, |_, columns| {
                let title = title
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| board::default_column_title(columns.len()));
                if board::find_column(columns, column_id).is_some() {
                    log::warn!("[clarity.store] column {} already exists, not adding", column_id);
                    return columns.to_vec();
                }
                board::add_column(columns, Column { id: column_id.clone(), title, cards: Vec::new() })
            })
        }
        Action::RenameColumn { project_id, column_id, title } => {
            update_board(state, project_id, now_ms, |_, columns| {
                board::update_column_title(columns, column_id, title)
            })
        }
        Action::DeleteColumn { project_id, column_id } => {
            update_board(state, project_id, now_ms, |_, columns| board::delete_column(columns, column_id))
        }
        Action::MoveColumn { project_id, from, to } => {
            update_board(state, project_id, now_ms, |_, columns| board::move_column(columns, *from, *to))
        }
        Action::AddCard { project_id, column_id, card_id, title, description } => {
            let title = title.trim();
            if title.is_empty() {
                return state.clone();
            }
            update_board(state, project_id, now_ms, |_, columns| {
                if board::find_card_column(columns, card_id).is_some() {
                    log::warn!("[clarity.store] card {} already exists, not adding", card_id);
                    return columns.to_vec();
                }
                let card = Card {
                    id: card_id.clone(),
                    title: title.to_string(),
                    description: description.trim().to_string(),
                    last_modified: now_ms,
                };
                board::add_card(columns, column_id, card)
            })
        }
        Action::UpdateCard { project_id, card_id, title, description } => {
            update_board(state, project_id, now_ms, |_, columns| {
                board::update_card(columns, card_id, title, description, now_ms)
            })
        }
        Action::SetCardDescription { project_id, card_id, description } => {
            update_board(state, project_id, now_ms, |_, columns| {
                board::set_card_description(columns, card_id, description, now_ms)
            })
        }
        Action::DeleteCard { project_id, card_id } => {
            update_board(state, project_id, now_ms, |_, columns| board::delete_card(columns, card_id))
        }
        Action::MoveCard { project_id, card_id, to_column_id, to_index } => {
            update_board(state, project_id, now_ms, |_, columns| {
                board::move_card_to_column(columns, card_id, to_column_id, *to_index)
            })
        }
        Action::ReorderCard { project_id, column_id, from, to } => {
            update_board(state, project_id, now_ms, |_, columns| {
                board::move_card_in_column(columns, column_id, *from, *to)
            })
        }
        Action::CommitDrag { project_id, commit } => {
            update_board(state, project_id, now_ms, |project, columns| {
                let allow_column_moves = project.effective_view_mode() == ViewMode::Board;
                drag::apply_commit(columns, commit, allow_column_moves)
            })
        }

        Action::UpdateNote { project_id, content } => {
            update_project(state, project_id, now_ms, |p| match p.data {
                ProjectData::Note(_) => Project {
                    data: ProjectData::Note(NoteData { content: content.clone() }),
                    ..p.clone()
                },
                _ => p.clone(),
            })
        }

        Action::AddChecklistItem { project_id, item_id, text } => {
            update_checklist(state, project_id, now_ms, |items| {
                if items.iter().any(|i| &i.id == item_id) {
                    log::warn!("[clarity.store] item {} already exists, not adding", item_id);
                    return items.to_vec();
                }
                let item = ChecklistItem {
                    id: item_id.clone(),
                    ..ChecklistItem::new(text.as_str())
                };
                checklist::add_item(items, item)
            })
        }
        Action::ToggleChecklistItem { project_id, item_id } => {
            update_checklist(state, project_id, now_ms, |items| checklist::toggle_item(items, item_id))
        }
        Action::UpdateChecklistItem { project_id, item_id, text } => {
            update_checklist(state, project_id, now_ms, |items| {
                checklist::update_item_text(items, item_id, text)
            })
        }
        Action::SetItemPriority { project_id, item_id, priority } => {
            update_checklist(state, project_id, now_ms, |items| {
                checklist::set_priority(items, item_id, *priority)
            })
        }
        Action::CycleItemPriority { project_id, item_id } => {
            update_checklist(state, project_id, now_ms, |items| checklist::cycle_priority(items, item_id))
        }
        Action::DeleteChecklistItem { project_id, item_id } => {
            update_checklist(state, project_id, now_ms, |items| checklist::delete_item(items, item_id))
        }
        Action::MoveChecklistItem { project_id, from, to } => {
            update_checklist(state, project_id, now_ms, |items| checklist::move_item(items, *from, *to))
        }

        Action::AddProject { project } => {
            if state.project(&project.id).is_some() {
                log::warn!("[clarity.store] project {} already exists, not adding", project.id);
                return state.clone();
            }
            let mut out = state.clone();
            out.projects.push(project.clone());
            out
        }
        Action::Replace { app_data } => match backup::validate_app_data(app_data) {
            Ok(()) => app_data.clone(),
            Err(e) => {
                log::warn!("[clarity.store] Refusing to replace document: {}", e);
                state.clone()
            }
        },
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Backup(#[from] BackupError),
}

/// Owns the live document and settings and writes every committed change
/// through to storage.
pub struct Store<S: DocumentStorage> {
    storage: S,
    app_data: AppData,
    settings: UserSettings,
    has_onboarded: bool,
    last_backup: Option<i64>,
}

impl<S: DocumentStorage> Store<S> {
    /// Load persisted state. A first run starts from the sample workspace;
    /// unreadable values fall back to their defaults.
    pub fn load(storage: S) -> Self {
        let app_data = storage::load_or_default(&storage, StorageKey::AppData, || {
            defaults::initial_app_data(timestamp_millis())
        });
        let settings = storage::load_or_default(&storage, StorageKey::UserSettings, UserSettings::default);
        let has_onboarded = storage::load_or_default(&storage, StorageKey::HasOnboarded, || false);
        let last_backup = storage::load_or_default(&storage, StorageKey::LastBackup, || None);
        log::info!(
            "[clarity.store] Loaded {} projects, {} categories",
            app_data.projects.len(),
            app_data.categories.len()
        );
        Self { storage, app_data, settings, has_onboarded, last_backup }
    }

    pub fn app_data(&self) -> &AppData {
        &self.app_data
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn has_onboarded(&self) -> bool {
        self.has_onboarded
    }

    pub fn last_backup(&self) -> Option<i64> {
        self.last_backup
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn dispatch(&mut self, action: &Action) -> Result<bool, StorageError> {
        self.dispatch_at(action, timestamp_millis())
    }

    /// Reduce `action` and persist the result. Returns whether the document
    /// changed; an unchanged document is not written.
    pub fn dispatch_at(&mut self, action: &Action, now_ms: i64) -> Result<bool, StorageError> {
        let next = reduce(&self.app_data, action, now_ms);
        if next == self.app_data {
            return Ok(false);
        }
        storage::save_json(&self.storage, StorageKey::AppData, &next)?;
        self.app_data = next;
        Ok(true)
    }

    pub fn set_settings(&mut self, settings: UserSettings) -> Result<(), StorageError> {
        storage::save_json(&self.storage, StorageKey::UserSettings, &settings)?;
        self.settings = settings;
        Ok(())
    }

    pub fn set_onboarded(&mut self, onboarded: bool) -> Result<(), StorageError> {
        storage::save_json(&self.storage, StorageKey::HasOnboarded, &onboarded)?;
        self.has_onboarded = onboarded;
        Ok(())
    }

    /// Serialize a backup and remember when it was taken.
    pub fn export_backup(&mut self) -> Result<String, StoreError> {
        let raw = backup::export_backup(&self.app_data, &self.settings)?;
        let now = timestamp_millis();
        storage::save_json(&self.storage, StorageKey::LastBackup, &Some(now))?;
        self.last_backup = Some(now);
        Ok(raw)
    }

    /// Validate a backup and, only if it is valid, replace the document and
    /// settings with it.
    pub fn import_backup(&mut self, raw: &str) -> Result<(), StoreError> {
        let file = backup::import_backup(raw)?;
        self.write_keys(&[
            (StorageKey::AppData, storage::to_json(StorageKey::AppData, &file.app_data)?),
            (StorageKey::UserSettings, storage::to_json(StorageKey::UserSettings, &file.user_settings)?),
        ])?;
        log::info!("[clarity.store] Imported backup with {} projects", file.app_data.projects.len());
        self.app_data = file.app_data;
        self.settings = file.user_settings;
        Ok(())
    }

    /// Back to the sample workspace with default settings; both flags cleared.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        let app_data = defaults::initial_app_data(timestamp_millis());
        let settings = UserSettings::default();
        self.write_keys(&[
            (StorageKey::AppData, storage::to_json(StorageKey::AppData, &app_data)?),
            (StorageKey::UserSettings, storage::to_json(StorageKey::UserSettings, &settings)?),
            (StorageKey::HasOnboarded, storage::to_json(StorageKey::HasOnboarded, &false)?),
            (StorageKey::LastBackup, storage::to_json(StorageKey::LastBackup, &Option::<i64>::None)?),
        ])?;
        log::info!("[clarity.store] Reset to sample workspace");
        self.app_data = app_data;
        self.settings = settings;
        self.has_onboarded = false;
        self.last_backup = None;
        Ok(())
    }

    /// Skip the sample workspace: empty document, onboarding done.
    pub fn start_fresh(&mut self) -> Result<(), StorageError> {
        let app_data = defaults::empty_app_data();
        self.write_keys(&[
            (StorageKey::AppData, storage::to_json(StorageKey::AppData, &app_data)?),
            (StorageKey::HasOnboarded, storage::to_json(StorageKey::HasOnboarded, &true)?),
        ])?;
        log::info!("[clarity.store] Started with an empty workspace");
        self.app_data = app_data;
        self.has_onboarded = true;
        Ok(())
    }

    /// Write several keys as one unit. If any write fails, the keys already
    /// written get their previous values back.
    fn write_keys(&self, values: &[(StorageKey, String)]) -> Result<(), StorageError> {
        let previous = values
            .iter()
            .map(|(key, _)| self.storage.read(*key).map(|raw| (*key, raw)))
            .collect::<Result<Vec<_>, _>>()?;

        for (idx, (key, raw)) in values.iter().enumerate() {
            if let Err(e) = self.storage.write(*key, raw) {
                log::error!("[clarity.store] Write of {} failed, rolling back: {}", key.as_str(), e);
                for (key, old) in previous[..idx].iter().rev() {
                    let restored = match old {
                        Some(old) => self.storage.write(*key, old),
                        None => self.storage.remove(*key),
                    };
                    if let Err(e) = restored {
                        log::error!("[clarity.store] Failed to restore {}: {}", key.as_str(), e);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::initial_app_data;
    use crate::drag::{DragPayload, DropTarget};
    use crate::storage::{LocalStorage, MemoryStorage};
    use serde_json::json;
    use tempfile::TempDir;

    /// Memory storage whose settings writes always fail.
    struct SettingsWriteFails(MemoryStorage);

    impl DocumentStorage for SettingsWriteFails {
        fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
            self.0.read(key)
        }

        fn write(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
            if key == StorageKey::UserSettings {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
            }
            self.0.write(key, value)
        }

        fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
            self.0.remove(key)
        }
    }

    fn stored_app_data<S: DocumentStorage>(store: &Store<S>) -> Option<AppData> {
        storage::load_json(store.storage(), StorageKey::AppData).unwrap()
    }

    fn sample() -> AppData {
        initial_app_data(0)
    }

    fn board_columns<'a>(data: &'a AppData, project_id: &str) -> &'a [Column] {
        data.project(project_id).and_then(|p| p.columns()).unwrap()
    }

    fn card_ids(column: &Column) -> Vec<&str> {
        column.cards.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_create_project_seeds_by_type() {
        let action = Action::create_project("Ideas", ProjectType::Note, Some("cat-2".into()));
        let id = action.project_id().unwrap().to_string();
        let out = reduce(&sample(), &action, 10);
        let project = out.project(&id).unwrap();
        assert_eq!(project.last_modified, 10);
        assert_eq!(project.category_id.as_deref(), Some("cat-2"));
        assert_eq!(project.data, ProjectData::Note(NoteData { content: "# Ideas\n\nStart writing here.".into() }));

        let action = Action::create_project("Sprint", ProjectType::Board, None);
        let id = action.project_id().unwrap().to_string();
        let out = reduce(&out, &action, 11);
        assert_eq!(out.project(&id).unwrap().view_mode, Some(ViewMode::List));
        assert_eq!(out.projects.len(), 5);

        assert_eq!(reduce(&sample(), &Action::create_project("  ", ProjectType::Checklist, None), 1), sample());
    }

    #[test]
    fn test_project_changes_stamp_last_modified() {
        let action = Action::RenameProject { project_id: "proj-2".into(), name: " Diary ".into() };
        let out = reduce(&sample(), &action, 500);
        let project = out.project("proj-2").unwrap();
        assert_eq!(project.name, "Diary");
        assert_eq!(project.last_modified, 500);
        assert_eq!(out.project("proj-1").unwrap().last_modified, 0);
    }

    #[test]
    fn test_unknown_ids_leave_state_unchanged() {
        let actions = vec![
            Action::RenameProject { project_id: "nope".into(), name: "x".into() },
            Action::DeleteCard { project_id: "proj-1".into(), card_id: "nope".into() },
            Action::ToggleChecklistItem { project_id: "proj-3".into(), item_id: "nope".into() },
            Action::RenameCategory { category_id: "nope".into(), name: "x".into() },
            Action::UpdateNote { project_id: "proj-1".into(), content: "wrong type".into() },
            Action::AddCard {
                project_id: "proj-3".into(),
                column_id: "col-1".into(),
                card_id: "x".into(),
                title: "wrong type".into(),
                description: String::new(),
            },
        ];
        for action in actions {
            assert_eq!(reduce(&sample(), &action, 99), sample(), "{:?}", action);
        }
    }

    #[test]
    fn test_card_lifecycle() {
        let add = Action::add_card("proj-1", "col-2", "  Write docs ", "");
        let Action::AddCard { card_id, .. } = &add else { unreachable!() };
        let card_id = card_id.clone();
        let out = reduce(&sample(), &add, 7);
        let columns = board_columns(&out, "proj-1");
        assert_eq!(card_ids(&columns[1]), vec!["card-3", card_id.as_str()]);
        assert_eq!(columns[1].cards[1].title, "Write docs");
        assert_eq!(columns[1].cards[1].last_modified, 7);

        let moved = reduce(
            &out,
            &Action::MoveCard {
                project_id: "proj-1".into(),
                card_id: card_id.clone(),
                to_column_id: "col-3".into(),
                to_index: Some(0),
            },
            8,
        );
        let columns = board_columns(&moved, "proj-1");
        assert_eq!(card_ids(&columns[2]), vec![card_id.as_str(), "card-4"]);
        assert_eq!(crate::board::card_count(columns), 5);

        let described = reduce(
            &moved,
            &Action::SetCardDescription {
                project_id: "proj-1".into(),
                card_id: card_id.clone(),
                description: "Enhanced text".into(),
            },
            9,
        );
        let card = &board_columns(&described, "proj-1")[2].cards[0];
        assert_eq!((card.title.as_str(), card.description.as_str()), ("Write docs", "Enhanced text"));
    }

    #[test]
    fn test_column_actions() {
        let out = reduce(&sample(), &Action::add_column("proj-1", None), 1);
        assert_eq!(board_columns(&out, "proj-1")[3].title, "New Column 4");

        let out = reduce(&out, &Action::MoveColumn { project_id: "proj-1".into(), from: 3, to: 0 }, 2);
        assert_eq!(board_columns(&out, "proj-1")[0].title, "New Column 4");

        let out = reduce(
            &out,
            &Action::DeleteColumn { project_id: "proj-1".into(), column_id: "col-1".into() },
            3,
        );
        assert!(crate::board::find_card_column(board_columns(&out, "proj-1"), "card-1").is_none());
    }

    #[test]
    fn test_commit_drag_respects_view_mode() {
        let commit = DragCommit { payload: DragPayload::column("col-3"), target: DropTarget::Column("col-1".into()) };
        let action = Action::CommitDrag { project_id: "proj-1".into(), commit };

        let out = reduce(&sample(), &action, 1);
        assert_eq!(board_columns(&out, "proj-1")[0].id, "col-3");

        let list = reduce(
            &sample(),
            &Action::SetViewMode { project_id: "proj-1".into(), view_mode: ViewMode::List },
            1,
        );
        assert_eq!(reduce(&list, &action, 2), list);
    }

    #[test]
    fn test_delete_category_leaves_dangling_reference() {
        let out = reduce(&sample(), &Action::DeleteCategory { category_id: "cat-2".into() }, 1);
        assert_eq!(out.categories.len(), 1);
        let note = out.project("proj-2").unwrap();
        assert_eq!(note.category_id.as_deref(), Some("cat-2"));
        assert_eq!(out.category_name(note.category_id.as_deref()), "Uncategorized");
    }

    #[test]
    fn test_checklist_actions() {
        let add = Action::add_checklist_item("proj-3", "Eggs");
        let out = reduce(&sample(), &add, 1);
        let ProjectData::Checklist(items) = &out.project("proj-3").unwrap().data else { unreachable!() };
        assert_eq!(items.len(), 5);
        assert_eq!(items[4].priority, Priority::Medium);

        let out = reduce(
            &out,
            &Action::CycleItemPriority { project_id: "proj-3".into(), item_id: "item-4".into() },
            2,
        );
        let ProjectData::Checklist(items) = &out.project("proj-3").unwrap().data else { unreachable!() };
        assert_eq!(items[3].priority, Priority::Medium);
    }

    #[test]
    fn test_action_json_shape() {
        let action: Action = serde_json::from_value(json!({
            "type": "addCard",
            "projectId": "proj-1",
            "columnId": "col-1",
            "title": "From JSON"
        }))
        .unwrap();
        let Action::AddCard { card_id, description, .. } = &action else { unreachable!() };
        assert!(!card_id.is_empty());
        assert_eq!(description, "");

        let drag: Action = serde_json::from_value(json!({
            "type": "commitDrag",
            "projectId": "proj-1",
            "commit": {
                "payload": { "type": "Card", "id": "card-1" },
                "target": { "type": "Column", "id": "col-3" }
            }
        }))
        .unwrap();
        let out = reduce(&sample(), &drag, 1);
        assert_eq!(card_ids(&board_columns(&out, "proj-1")[2]), vec!["card-4", "card-1"]);
    }

    #[test]
    fn test_store_persists_only_changes() {
        let mut store = Store::load(MemoryStorage::new());
        assert_eq!(store.app_data().projects.len(), 3);
        assert_eq!(store.storage().read(StorageKey::AppData).unwrap(), None);

        let noop = Action::DeleteProject { project_id: "missing".into() };
        assert!(!store.dispatch(&noop).unwrap());
        assert_eq!(store.storage().read(StorageKey::AppData).unwrap(), None);

        assert!(store.dispatch(&Action::DeleteProject { project_id: "proj-2".into() }).unwrap());
        let saved: AppData =
            serde_json::from_str(&store.storage().read(StorageKey::AppData).unwrap().unwrap()).unwrap();
        assert_eq!(&saved, store.app_data());
    }

    #[test]
    fn test_store_reload_from_disk() {
        let tmp = TempDir::new().unwrap();
        {
            let mut store = Store::load(LocalStorage::open(tmp.path()).unwrap());
            store.dispatch(&Action::create_category("Work")).unwrap();
            store.set_onboarded(true).unwrap();
        }
        let store = Store::load(LocalStorage::open(tmp.path()).unwrap());
        assert_eq!(store.app_data().categories.len(), 3);
        assert!(store.has_onboarded());
    }

    #[test]
    fn test_export_import_and_reset() {
        let mut store = Store::load(MemoryStorage::new());
        store.dispatch(&Action::DeleteProject { project_id: "proj-1".into() }).unwrap();
        let exported = store.export_backup().unwrap();
        assert!(store.last_backup().is_some());

        let mut other = Store::load(MemoryStorage::new());
        assert!(other.import_backup("{}").is_err());
        assert_eq!(other.app_data().projects.len(), 3, "failed import changes nothing");
        other.import_backup(&exported).unwrap();
        assert_eq!(other.app_data(), store.app_data());

        store.set_onboarded(true).unwrap();
        store.reset().unwrap();
        assert_eq!(store.app_data().projects.len(), 3);
        assert!(!store.has_onboarded());
        assert_eq!(store.last_backup(), None);
        assert_eq!(store.settings(), &UserSettings::default());
    }

    #[test]
    fn test_add_with_existing_id_is_noop() {
        let state = sample();
        let dup_card = Action::AddCard {
            project_id: "proj-1".into(),
            column_id: "col-2".into(),
            card_id: "card-1".into(),
            title: "dup".into(),
            description: String::new(),
        };
        assert_eq!(reduce(&state, &dup_card, 5), state);

        let dup_column = Action::AddColumn {
            project_id: "proj-1".into(),
            column_id: "col-1".into(),
            title: Some("Again".into()),
        };
        assert_eq!(reduce(&state, &dup_column, 5), state);

        let dup_item = Action::AddChecklistItem {
            project_id: "proj-3".into(),
            item_id: "item-2".into(),
            text: "Bread again".into(),
        };
        assert_eq!(reduce(&state, &dup_item, 5), state);
    }

    #[test]
    fn test_replace_rejects_colliding_ids() {
        let state = sample();
        let mut broken = sample();
        let copy = broken.projects[1].clone();
        broken.projects.push(copy);
        assert_eq!(reduce(&state, &Action::Replace { app_data: broken }, 5), state);
    }

    #[test]
    fn test_own_export_always_reimports() {
        let mut store = Store::load(MemoryStorage::new());
        let action: Action = serde_json::from_value(json!({
            "type": "addCard",
            "projectId": "proj-1",
            "columnId": "col-2",
            "cardId": "card-1",
            "title": "dup"
        }))
        .unwrap();
        assert!(!store.dispatch(&action).unwrap());

        let exported = store.export_backup().unwrap();
        let mut other = Store::load(MemoryStorage::new());
        other.import_backup(&exported).unwrap();
        assert_eq!(other.app_data(), store.app_data());
    }

    #[test]
    fn test_failed_import_rolls_back_disk() {
        let mut source = Store::load(MemoryStorage::new());
        source.dispatch(&Action::DeleteProject { project_id: "proj-1".into() }).unwrap();
        source.dispatch(&Action::DeleteProject { project_id: "proj-2".into() }).unwrap();
        let exported = source.export_backup().unwrap();

        let mut store = Store::load(SettingsWriteFails(MemoryStorage::new()));
        assert!(matches!(store.import_backup(&exported), Err(StoreError::Storage(_))));
        assert_eq!(store.app_data().projects.len(), 3);
        assert_eq!(stored_app_data(&store), None, "never-written key is removed again");

        store.dispatch(&Action::DeleteProject { project_id: "proj-3".into() }).unwrap();
        assert!(store.import_backup(&exported).is_err());
        assert_eq!(store.app_data().projects.len(), 2);
        assert_eq!(stored_app_data(&store).unwrap().projects.len(), 2);
    }

    #[test]
    fn test_failed_reset_keeps_previous_document() {
        let mut store = Store::load(SettingsWriteFails(MemoryStorage::new()));
        store.dispatch(&Action::DeleteProject { project_id: "proj-1".into() }).unwrap();
        assert!(store.reset().is_err());
        assert_eq!(store.app_data().projects.len(), 2);
        assert_eq!(stored_app_data(&store).unwrap().projects.len(), 2);
    }

    #[test]
    fn test_start_fresh_empties_and_onboards() {
        let tmp = TempDir::new().unwrap();
        {
            let mut store = Store::load(LocalStorage::open(tmp.path()).unwrap());
            store.start_fresh().unwrap();
            assert!(store.app_data().projects.is_empty());
            assert!(store.app_data().categories.is_empty());
            assert!(store.has_onboarded());
        }
        let store = Store::load(LocalStorage::open(tmp.path()).unwrap());
        assert_eq!(store.app_data(), &AppData::default());
        assert!(store.has_onboarded());
    }
}
