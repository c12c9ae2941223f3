use regex::{Captures, Regex, RegexBuilder};

use crate::types::{AppData, MatchField, Project, ProjectData, SearchResult};

/// Characters of context kept on each side of the first match.
const SNIPPET_RADIUS: usize = 50;
const HIGHLIGHT_OPEN: &str = "<mark>";
const HIGHLIGHT_CLOSE: &str = "</mark>";
const ELLIPSIS: &str = "...";

/// A compiled literal, case-insensitive query.
pub struct SearchEngine {
    regex: Option<Regex>,
}

impl SearchEngine {
    /// Compile `raw_query` as an escaped literal. A blank query compiles to
    /// an engine that matches nothing.
    pub fn compile(raw_query: &str) -> Self {
        if raw_query.trim().is_empty() {
            return Self { regex: None };
        }
        let regex = match RegexBuilder::new(&regex::escape(raw_query))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(regex),
            Err(e) => {
                log::warn!("[clarity.search] Failed to compile query {:?}: {}", raw_query, e);
                None
            }
        };
        Self { regex }
    }

    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    /// Excerpt around the first match with every occurrence inside the
    /// excerpt wrapped in `<mark>`. Returns `None` when nothing matches.
    pub fn snippet(&self, text: &str) -> Option<String> {
        let regex = self.regex.as_ref()?;
        let found = regex.find(text)?;

        let start = text[..found.start()]
            .char_indices()
            .rev()
            .nth(SNIPPET_RADIUS - 1)
            .map(|(i, _)| i)
            .unwrap_or(0);
        let end = text[found.end()..]
            .char_indices()
            .nth(SNIPPET_RADIUS)
            .map(|(i, _)| found.end() + i)
            .unwrap_or(text.len());

        let highlighted = regex.replace_all(&text[start..end], |caps: &Captures| {
            format!("{}{}{}", HIGHLIGHT_OPEN, &caps[0], HIGHLIGHT_CLOSE)
        });

        let mut snippet = String::with_capacity(highlighted.len() + 2 * ELLIPSIS.len());
        if start > 0 {
            snippet.push_str(ELLIPSIS);
        }
        snippet.push_str(&highlighted);
        if end < text.len() {
            snippet.push_str(ELLIPSIS);
        }
        Some(snippet)
    }
}

/// Search every project in document order and return one result per
/// matching field.
///
/// Order: project name first, then the project's content (cards in column
/// order, the note body, or checklist items). A card yields at most one
/// result: its title if that matches, otherwise its description.
pub fn perform_search(query: &str, app_data: &AppData) -> Vec<SearchResult> {
    let engine = SearchEngine::compile(query);
    if engine.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    for project in &app_data.projects {
        let category_name = app_data.category_name(project.category_id.as_deref());
        let push = |results: &mut Vec<SearchResult>,
                    title: &str,
                    snippet: String,
                    item_id: Option<&str>,
                    field: MatchField| {
            results.push(SearchResult {
                project_id: project.id.clone(),
                project_type: project.project_type(),
                project_category_name: category_name.to_string(),
                title: title.to_string(),
                snippet,
                item_id: item_id.map(str::to_string),
                field,
            });
        };

        if let Some(snippet) = engine.snippet(&project.name) {
            push(&mut results, &project.name, snippet, None, MatchField::ProjectName);
        }

        search_project_data(&engine, project, |title, snippet, item_id, field| {
            push(&mut results, title, snippet, item_id, field)
        });
    }

    results
}

fn search_project_data(
    engine: &SearchEngine,
    project: &Project,
    mut emit: impl FnMut(&str, String, Option<&str>, MatchField),
) {
    match &project.data {
        ProjectData::Board(columns) => {
            for card in columns.iter().flat_map(|col| col.cards.iter()) {
                if let Some(snippet) = engine.snippet(&card.title) {
                    emit(&card.title, snippet, Some(&card.id), MatchField::CardTitle);
                } else if let Some(snippet) = engine.snippet(&card.description) {
                    emit(&card.title, snippet, Some(&card.id), MatchField::CardDescription);
                }
            }
        }
        ProjectData::Note(note) => {
            if let Some(snippet) = engine.snippet(&note.content) {
                emit(&project.name, snippet, None, MatchField::NoteContent);
            }
        }
        ProjectData::Checklist(items) => {
            for item in items {
                if let Some(snippet) = engine.snippet(&item.text) {
                    emit(&item.text, snippet, Some(&item.id), MatchField::ChecklistItem);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Card, Category, ChecklistItem, Column, NoteData, Priority, ProjectType};

    fn project(id: &str, name: &str, category_id: Option<&str>, data: ProjectData) -> Project {
        Project {
            id: id.into(),
            name: name.into(),
            category_id: category_id.map(str::to_string),
            data,
            last_modified: 0,
            view_mode: None,
        }
    }

    fn sample() -> AppData {
        AppData {
            categories: vec![Category { id: "cat-1".into(), name: "Work".into(), color: "blue".into() }],
            projects: vec![
                project(
                    "board-1",
                    "Launch plan",
                    Some("cat-1"),
                    ProjectData::Board(vec![
                        Column {
                            id: "col-1".into(),
                            title: "To Do".into(),
                            cards: vec![
                                Card {
                                    id: "card-1".into(),
                                    title: "Write launch post".into(),
                                    description: "Mention the plan".into(),
                                    last_modified: 0,
                                },
                                Card {
                                    id: "card-2".into(),
                                    title: "Ship".into(),
                                    description: "Follow the launch checklist".into(),
                                    last_modified: 0,
                                },
                            ],
                        },
                        Column { id: "col-2".into(), title: "Done".into(), cards: vec![] },
                    ]),
                ),
                project(
                    "note-1",
                    "Journal",
                    Some("deleted-category"),
                    ProjectData::Note(NoteData { content: "Launch went fine.".into() }),
                ),
                project(
                    "list-1",
                    "Groceries",
                    None,
                    ProjectData::Checklist(vec![ChecklistItem {
                        id: "item-1".into(),
                        text: "Buy milk".into(),
                        completed: false,
                        priority: Priority::Medium,
                    }]),
                ),
            ],
        }
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        assert!(perform_search("", &sample()).is_empty());
        assert!(perform_search("   ", &sample()).is_empty());
        assert!(perform_search("", &AppData::default()).is_empty());
    }

    #[test]
    fn test_no_match_returns_nothing() {
        assert!(perform_search("zebra", &sample()).is_empty());
    }

    #[test]
    fn test_results_in_document_order() {
        let results = perform_search("launch", &sample());
        let fields: Vec<_> = results.iter().map(|r| (r.project_id.as_str(), r.field)).collect();
        assert_eq!(
            fields,
            vec![
                ("board-1", MatchField::ProjectName),
                ("board-1", MatchField::CardTitle),
                ("board-1", MatchField::CardDescription),
                ("note-1", MatchField::NoteContent),
            ]
        );
        assert_eq!(results[1].title, "Write launch post");
        assert_eq!(results[1].item_id.as_deref(), Some("card-1"));
        assert_eq!(results[2].title, "Ship");
        assert_eq!(results[3].title, "Journal");
    }

    #[test]
    fn test_card_title_match_carries_project_and_highlight() {
        let results = perform_search("post", &sample());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].project_id, "board-1");
        assert_eq!(results[0].project_type, ProjectType::Board);
        assert_eq!(results[0].project_category_name, "Work");
        assert!(results[0].snippet.contains("<mark>post</mark>"));
    }

    #[test]
    fn test_checklist_match_is_case_insensitive() {
        let results = perform_search("MILK", &sample());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].snippet, "Buy <mark>milk</mark>");
        assert_eq!(results[0].project_category_name, "Uncategorized");

        let results = perform_search("milk", &sample());
        assert!(results[0].snippet.contains("<mark>milk</mark>"));
    }

    #[test]
    fn test_dangling_category_is_uncategorized() {
        let results = perform_search("went", &sample());
        assert_eq!(results[0].project_category_name, "Uncategorized");
    }

    #[test]
    fn test_special_characters_are_literal() {
        let engine = SearchEngine::compile("a.c (x)");
        assert_eq!(engine.snippet("see a.c (x) here").unwrap(), "see <mark>a.c (x)</mark> here");
        assert!(engine.snippet("abc (x)").is_none());
    }

    #[test]
    fn test_snippet_window_and_ellipsis() {
        let text = format!("{}needle{}", "x".repeat(80), "y".repeat(80));
        let snippet = SearchEngine::compile("needle").snippet(&text).unwrap();
        let expected = format!("...{}<mark>needle</mark>{}...", "x".repeat(50), "y".repeat(50));
        assert_eq!(snippet, expected);
    }

    #[test]
    fn test_snippet_highlights_every_occurrence_in_window() {
        let snippet = SearchEngine::compile("ab").snippet("ab cd AB ef ab").unwrap();
        assert_eq!(snippet, "<mark>ab</mark> cd <mark>AB</mark> ef <mark>ab</mark>");
    }

    #[test]
    fn test_snippet_counts_characters_not_bytes() {
        let text = format!("{}hit{}", "é".repeat(60), "ü".repeat(60));
        let snippet = SearchEngine::compile("hit").snippet(&text).unwrap();
        assert_eq!(snippet.matches('é').count(), 50);
        assert_eq!(snippet.matches('ü').count(), 50);
        assert!(snippet.starts_with("...") && snippet.ends_with("..."));
    }

    #[test]
    fn test_dot_query_does_not_highlight_ellipsis() {
        let text = format!("{}.{}", "a".repeat(70), "b".repeat(70));
        let snippet = SearchEngine::compile(".").snippet(&text).unwrap();
        assert_eq!(snippet.matches("<mark>").count(), 1);
    }
}
