/// Documents the app starts from: the guided sample workspace and the empty
/// "start fresh" workspace.
use crate::types::{
    AppData, Card, Category, ChecklistItem, Column, NoteData, Priority, Project, ProjectData, ProjectType,
    ViewMode,
};

const WELCOME_NOTE: &str = "# Welcome to Rich Notes!\n\nThis is your first note. You can use **Markdown** to format your text.\n\n- Create lists\n- **Bold** and *italic* text\n- Add headings\n\nToggle between edit and preview modes to see your changes.";

pub fn empty_app_data() -> AppData {
    AppData::default()
}

/// The onboarding workspace with one project of each type. Fixed ids keep it
/// stable across resets; every timestamp is `now_ms`.
pub fn initial_app_data(now_ms: i64) -> AppData {
    let card = |id: &str, title: &str, description: &str| Card {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        last_modified: now_ms,
    };
    let item = |id: &str, text: &str, completed: bool, priority: Priority| ChecklistItem {
        id: id.to_string(),
        text: text.to_string(),
        completed,
        priority,
    };

    let welcome_board = vec![
        Column {
            id: "col-1".into(),
            title: "To Do".into(),
            cards: vec![
                card(
                    "card-1",
                    "Install Clarity Board",
                    "Add this app to your home screen for easy, offline access.",
                ),
                card(
                    "card-2",
                    "Explore Categories",
                    "Create, rename, and color-code categories in the new sidebar.",
                ),
            ],
        },
        Column {
            id: "col-2".into(),
            title: "In Progress".into(),
            cards: vec![card(
                "card-3",
                "Check out the Dashboard",
                "The new home screen gives you a quick overview of your work.",
            )],
        },
        Column {
            id: "col-3".into(),
            title: "Done".into(),
            cards: vec![card(
                "card-4",
                "Welcome to Clarity Board v2!",
                "Your new privacy-focused productivity hub. All data is stored locally on your device.",
            )],
        },
    ];

    let shopping = vec![
        item("item-1", "Milk", false, Priority::Medium),
        item("item-2", "Bread", true, Priority::Medium),
        item("item-3", "Coffee Beans", false, Priority::High),
        item("item-4", "Snacks for the week", false, Priority::Low),
    ];

    AppData {
        categories: vec![
            Category { id: "cat-1".into(), name: "Productivity".into(), color: "blue".into() },
            Category { id: "cat-2".into(), name: "Personal".into(), color: "green".into() },
        ],
        projects: vec![
            Project {
                id: "proj-1".into(),
                name: "Welcome Board".into(),
                category_id: Some("cat-1".into()),
                data: ProjectData::Board(welcome_board),
                last_modified: now_ms,
                view_mode: None,
            },
            Project {
                id: "proj-2".into(),
                name: "My First Note".into(),
                category_id: Some("cat-2".into()),
                data: ProjectData::Note(NoteData { content: WELCOME_NOTE.into() }),
                last_modified: now_ms,
                view_mode: None,
            },
            Project {
                id: "proj-3".into(),
                name: "Shopping List".into(),
                category_id: Some("cat-2".into()),
                data: ProjectData::Checklist(shopping),
                last_modified: now_ms,
                view_mode: None,
            },
        ],
    }
}

/// Starter content for a project created from the sidebar.
pub fn new_project_data(name: &str, kind: ProjectType) -> (ProjectData, Option<ViewMode>) {
    match kind {
        ProjectType::Board => (ProjectData::Board(Vec::new()), Some(ViewMode::List)),
        ProjectType::Note => (
            ProjectData::Note(NoteData { content: format!("# {}\n\nStart writing here.", name) }),
            None,
        ),
        ProjectType::Checklist => (ProjectData::Checklist(Vec::new()), None),
    }
}
