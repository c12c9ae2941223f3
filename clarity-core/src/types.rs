use serde::{Deserialize, Serialize};

/// Category label shown for projects without a category, or whose category
/// no longer exists.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Colors the sidebar knows how to render. Anything else falls back to gray
/// on display but is preserved in the document.
pub const CATEGORY_COLORS: &[&str] = &["blue", "green", "red", "yellow", "purple", "pink", "gray"];
pub const DEFAULT_CATEGORY_COLOR: &str = "blue";

/// Generate a fresh entity id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current wall-clock time as Unix milliseconds (the `lastModified` unit).
pub fn timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Self {
            id: new_id(),
            name: name.trim().to_string(),
            color: DEFAULT_CATEGORY_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Board,
    Note,
    Checklist,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Board => "board",
            ProjectType::Note => "note",
            ProjectType::Checklist => "checklist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub last_modified: i64,
}

impl Card {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            description: description.into(),
            last_modified: timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            cards: Vec::new(),
        }
    }

    /// Index of a card inside this column.
    pub fn position_of(&self, card_id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }

    /// The dashboard treats a column titled "done" (any case) as the
    /// completed lane. This is a naming convention, not a status flag.
    pub fn is_done_column(&self) -> bool {
        self.title.to_lowercase() == "done"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteData {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Next priority in the low → medium → high → low cycle.
    pub fn next(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            completed: false,
            priority: Priority::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Board,
    List,
}

/// Project payload, discriminated by the project's `type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectData {
    Board(Vec<Column>),
    Note(NoteData),
    Checklist(Vec<ChecklistItem>),
}

impl ProjectData {
    pub fn project_type(&self) -> ProjectType {
        match self {
            ProjectData::Board(_) => ProjectType::Board,
            ProjectData::Note(_) => ProjectType::Note,
            ProjectData::Checklist(_) => ProjectType::Checklist,
        }
    }
}

/// A board, note or checklist.
///
/// On the wire `type` and `data` are sibling fields, exactly as the browser
/// app stored them; in memory they collapse into [`ProjectData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProjectRecord", into = "ProjectRecord")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub category_id: Option<String>,
    pub data: ProjectData,
    pub last_modified: i64,
    pub view_mode: Option<ViewMode>,
}

impl Project {
    pub fn project_type(&self) -> ProjectType {
        self.data.project_type()
    }

    pub fn columns(&self) -> Option<&[Column]> {
        match &self.data {
            ProjectData::Board(columns) => Some(columns),
            _ => None,
        }
    }

    /// Boards default to the board layout when no view mode was stored.
    pub fn effective_view_mode(&self) -> ViewMode {
        self.view_mode.unwrap_or(ViewMode::Board)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectRecord {
    id: String,
    name: String,
    #[serde(rename = "type")]
    project_type: ProjectType,
    #[serde(default)]
    category_id: Option<String>,
    data: serde_json::Value,
    last_modified: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    view_mode: Option<ViewMode>,
}

impl TryFrom<ProjectRecord> for Project {
    type Error = serde_json::Error;

    fn try_from(record: ProjectRecord) -> Result<Self, Self::Error> {
        let data = match record.project_type {
            ProjectType::Board => ProjectData::Board(serde_json::from_value(record.data)?),
            // NoteData would also accept a sequence; only an object is a note.
            ProjectType::Note if !record.data.is_object() => {
                return Err(serde::de::Error::custom(format!(
                    "note project {} must have object data",
                    record.id
                )));
            }
            ProjectType::Note => ProjectData::Note(serde_json::from_value(record.data)?),
            ProjectType::Checklist => {
                ProjectData::Checklist(serde_json::from_value(record.data)?)
            }
        };
        Ok(Project {
            id: record.id,
            name: record.name,
            category_id: record.category_id,
            data,
            last_modified: record.last_modified,
            view_mode: record.view_mode,
        })
    }
}

impl From<Project> for ProjectRecord {
    fn from(project: Project) -> Self {
        let project_type = project.project_type();
        let data = match project.data {
            ProjectData::Board(columns) => serde_json::to_value(columns),
            ProjectData::Note(note) => serde_json::to_value(note),
            ProjectData::Checklist(items) => serde_json::to_value(items),
        }
        .unwrap_or(serde_json::Value::Null);
        ProjectRecord {
            id: project.id,
            name: project.name,
            project_type,
            category_id: project.category_id,
            data,
            last_modified: project.last_modified,
            view_mode: project.view_mode,
        }
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl AppData {
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    /// Resolve a project's category to a display name, degrading to
    /// [`UNCATEGORIZED`] for null or dangling references.
    pub fn category_name(&self, category_id: Option<&str>) -> &str {
        category_id
            .and_then(|id| self.categories.iter().find(|c| c.id == id))
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED)
    }
}

/// Which text field produced a search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchField {
    ProjectName,
    CardTitle,
    CardDescription,
    NoteContent,
    ChecklistItem,
}

/// A search result entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub project_id: String,
    pub project_type: ProjectType,
    pub project_category_name: String,
    pub title: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub field: MatchField,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_wire_shape_keeps_type_and_data_siblings() {
        let raw = json!({
            "id": "proj-3",
            "name": "Shopping List",
            "type": "checklist",
            "categoryId": null,
            "lastModified": 1700000000000_i64,
            "data": [
                { "id": "item-1", "text": "Milk", "completed": false, "priority": "medium" }
            ]
        });
        let project: Project = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(project.project_type(), ProjectType::Checklist);
        match &project.data {
            ProjectData::Checklist(items) => assert_eq!(items[0].text, "Milk"),
            other => panic!("unexpected data {:?}", other),
        }
        assert_eq!(serde_json::to_value(&project).unwrap(), raw);
    }

    #[test]
    fn test_project_data_must_match_type() {
        let raw = json!({
            "id": "p",
            "name": "Broken",
            "type": "note",
            "categoryId": null,
            "lastModified": 0,
            "data": []
        });
        assert!(serde_json::from_value::<Project>(raw).is_err());

        let board_as_note = json!({
            "id": "p",
            "name": "Broken",
            "type": "board",
            "lastModified": 0,
            "data": { "content": "hi" }
        });
        assert!(serde_json::from_value::<Project>(board_as_note).is_err());
    }

    #[test]
    fn test_category_name_falls_back_to_uncategorized() {
        let data = AppData {
            categories: vec![Category {
                id: "cat-1".into(),
                name: "Work".into(),
                color: "blue".into(),
            }],
            projects: Vec::new(),
        };
        assert_eq!(data.category_name(Some("cat-1")), "Work");
        assert_eq!(data.category_name(Some("gone")), UNCATEGORIZED);
        assert_eq!(data.category_name(None), UNCATEGORIZED);
    }

    #[test]
    fn test_priority_cycle() {
        assert_eq!(Priority::Low.next(), Priority::Medium);
        assert_eq!(Priority::Medium.next(), Priority::High);
        assert_eq!(Priority::High.next(), Priority::Low);
    }

    #[test]
    fn test_done_column_is_case_insensitive() {
        assert!(Column::new("DONE").is_done_column());
        assert!(Column::new("Done").is_done_column());
        assert!(!Column::new("Done-ish").is_done_column());
    }
}
