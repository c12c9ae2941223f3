/// Dashboard statistics derived from the document. Nothing here is stored.
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::board;
use crate::checklist::{self, Progress};
use crate::types::{AppData, Column, Project, ProjectData, ProjectType, CATEGORY_COLORS, UNCATEGORIZED};

pub const RECENT_PROJECT_LIMIT: usize = 6;
const NOTE_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub total_projects: usize,
    /// Board cards plus checklist items.
    pub total_items: usize,
    /// Cards in a "Done" column plus completed checklist items.
    pub completed_items: usize,
    pub total_categories: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SummaryDetail {
    #[serde(rename_all = "camelCase")]
    Board { progress: Progress, status_summary: String },
    Checklist { progress: Progress },
    Note { preview: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project_id: String,
    pub name: String,
    pub project_type: ProjectType,
    pub category_name: String,
    pub last_modified: i64,
    pub detail: SummaryDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// `None` for the Uncategorized group.
    pub category_id: Option<String>,
    pub name: String,
    pub color: String,
    pub project_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub totals: DashboardTotals,
    pub recent_projects: Vec<ProjectSummary>,
    pub categories: Vec<CategoryCount>,
}

pub fn dashboard(app_data: &AppData) -> Dashboard {
    Dashboard {
        totals: totals(app_data),
        recent_projects: recent_projects(app_data, RECENT_PROJECT_LIMIT)
            .into_iter()
            .map(|p| summarize(app_data, p))
            .collect(),
        categories: category_counts(app_data),
    }
}

fn done_column(columns: &[Column]) -> Option<&Column> {
    columns.iter().find(|c| c.is_done_column())
}

fn board_progress(columns: &[Column]) -> Progress {
    let total = board::card_count(columns);
    let completed = done_column(columns).map_or(0, |c| c.cards.len());
    Progress::new(completed, total)
}

pub fn totals(app_data: &AppData) -> DashboardTotals {
    let mut totals = DashboardTotals {
        total_projects: app_data.projects.len(),
        total_categories: app_data.categories.len(),
        ..DashboardTotals::default()
    };
    for project in &app_data.projects {
        let progress = match &project.data {
            ProjectData::Board(columns) => board_progress(columns),
            ProjectData::Checklist(items) => checklist::progress(items),
            ProjectData::Note(_) => continue,
        };
        totals.total_items += progress.total;
        totals.completed_items += progress.completed;
    }
    totals
}

/// Most recently modified first. Ties keep document order.
pub fn recent_projects(app_data: &AppData, limit: usize) -> Vec<&Project> {
    let mut projects: Vec<&Project> = app_data.projects.iter().collect();
    projects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    projects.truncate(limit);
    projects
}

pub fn summarize(app_data: &AppData, project: &Project) -> ProjectSummary {
    let detail = match &project.data {
        ProjectData::Board(columns) => SummaryDetail::Board {
            progress: board_progress(columns),
            status_summary: columns
                .iter()
                .map(|c| format!("{} {}", c.cards.len(), c.title))
                .collect::<Vec<_>>()
                .join(", "),
        },
        ProjectData::Checklist(items) => SummaryDetail::Checklist {
            progress: checklist::progress(items),
        },
        ProjectData::Note(note) => SummaryDetail::Note {
            preview: note_preview(&note.content),
        },
    };
    ProjectSummary {
        project_id: project.id.clone(),
        name: project.name.clone(),
        project_type: project.project_type(),
        category_name: app_data.category_name(project.category_id.as_deref()).to_string(),
        last_modified: project.last_modified,
        detail,
    }
}

fn heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#+\s").expect("valid heading regex"))
}

fn strong_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*|__(.*?)__").expect("valid strong regex"))
}

fn emphasis_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*(.*?)\*|_(.*?)_").expect("valid emphasis regex"))
}

/// Plain-text preview of a markdown note: heading markers and bold/italic
/// delimiters removed, newlines flattened, cut at 100 characters.
pub fn note_preview(content: &str) -> String {
    let text = heading_regex().replace_all(content, "");
    let text = strong_regex().replace_all(&text, "$1$2");
    let text = emphasis_regex().replace_all(&text, "$1$2");
    let text = text.replace('\n', " ");

    let mut preview: String = text.chars().take(NOTE_PREVIEW_CHARS).collect();
    if preview.chars().count() == NOTE_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

/// Colors outside the known palette render as gray.
fn display_color(color: &str) -> &str {
    if CATEGORY_COLORS.contains(&color) {
        color
    } else {
        "gray"
    }
}

/// Sidebar groups: every category in order, then Uncategorized if any
/// project has no category or points at a deleted one.
pub fn category_counts(app_data: &AppData) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = app_data
        .categories
        .iter()
        .map(|c| CategoryCount {
            category_id: Some(c.id.clone()),
            name: c.name.clone(),
            color: display_color(&c.color).to_string(),
            project_count: app_data
                .projects
                .iter()
                .filter(|p| p.category_id.as_deref() == Some(c.id.as_str()))
                .count(),
        })
        .collect();

    let uncategorized = app_data
        .projects
        .iter()
        .filter(|p| match &p.category_id {
            Some(id) => !app_data.categories.iter().any(|c| &c.id == id),
            None => true,
        })
        .count();
    if uncategorized > 0 {
        counts.push(CategoryCount {
            category_id: None,
            name: UNCATEGORIZED.to_string(),
            color: "gray".to_string(),
            project_count: uncategorized,
        });
    }
    counts
}
