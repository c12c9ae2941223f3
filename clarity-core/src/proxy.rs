/// Wire contract of the AI proxy, plus the pure pieces around it: prompt
/// text and turning a smart-split answer into a board project.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{new_id, Card, Column, Project, ProjectData, ViewMode};

pub const MSG_METHOD_NOT_ALLOWED: &str = "Method Not Allowed";
pub const MSG_NOT_CONFIGURED: &str = "The AI service is not configured on the server.";
pub const MSG_INVALID_TYPE: &str = "Invalid request type specified.";
pub const MSG_UPSTREAM_FAILED: &str = "The AI service failed to process the request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnhanceOption {
    Summarize,
    Brainstorm,
    Improve,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhanceTextPayload {
    pub option: EnhanceOption,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateProjectPayload {
    pub text: String,
}

/// Body POSTed to the proxy: `{ "type": ..., "payload": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ProxyRequest {
    EnhanceText(EnhanceTextPayload),
    GenerateProject(GenerateProjectPayload),
}

#[derive(Debug, Error)]
pub enum ProxyRequestError {
    #[error("Invalid request type specified.")]
    InvalidType(String),
    #[error("{0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct RawProxyRequest {
    /// Any JSON value; anything but a known string is an invalid type.
    #[serde(rename = "type", default)]
    kind: serde_json::Value,
    #[serde(default)]
    payload: serde_json::Value,
}

impl ProxyRequest {
    /// Parse a request body, telling an unknown `type` apart from a malformed
    /// body or payload. An empty body is treated as `{}`.
    pub fn parse(body: &[u8]) -> Result<Self, ProxyRequestError> {
        let body = if body.iter().all(u8::is_ascii_whitespace) { b"{}".as_slice() } else { body };
        let raw: RawProxyRequest = serde_json::from_slice(body)?;
        match raw.kind.as_str() {
            Some("enhanceText") => Ok(ProxyRequest::EnhanceText(serde_json::from_value(raw.payload)?)),
            Some("generateProject") => {
                Ok(ProxyRequest::GenerateProject(serde_json::from_value(raw.payload)?))
            }
            Some(other) => Err(ProxyRequestError::InvalidType(other.to_string())),
            None => Err(ProxyRequestError::InvalidType(raw.kind.to_string())),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProxyRequest::EnhanceText(_) => "enhanceText",
            ProxyRequest::GenerateProject(_) => "generateProject",
        }
    }

    /// Prompt sent to the model for this request.
    pub fn prompt(&self) -> String {
        match self {
            ProxyRequest::EnhanceText(p) => enhance_prompt(p.option, &p.text),
            ProxyRequest::GenerateProject(p) => generate_project_prompt(&p.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhanceTextResponse {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartSplitTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartSplitResponse {
    pub project_name: String,
    pub tasks: Vec<SmartSplitTask>,
}

pub fn enhance_prompt(option: EnhanceOption, text: &str) -> String {
    match option {
        EnhanceOption::Summarize => format!(
            "Summarize the following text into key bullet points:\n\n---\n{}\n---",
            text
        ),
        EnhanceOption::Brainstorm => format!(
            "Based on the following task or idea, brainstorm a list of actionable sub-tasks or related concepts. Present them as a clear, easy-to-read list:\n\n---\n{}\n---",
            text
        ),
        EnhanceOption::Improve => format!(
            "Rewrite the following text to be more clear, concise, and professional. Do not add extra information, just improve the writing quality:\n\n---\n{}\n---",
            text
        ),
    }
}

pub fn generate_project_prompt(text: &str) -> String {
    format!(
        "Analyze the following unstructured text and extract actionable tasks. Propose a suitable project name for these tasks. Return the output as a valid JSON object. The JSON object must contain a 'projectName' (string) and a 'tasks' (array). Each object in the 'tasks' array should have a 'title' (string) and a 'description' (string). Ensure the description is detailed if context is available in the text. Here is the text:\n\n---\n{}\n---",
        text
    )
}

/// JSON schema the model must follow for `generateProject`.
pub fn smart_split_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "projectName": {
                "type": "STRING",
                "description": "A concise name for the project based on the text."
            },
            "tasks": {
                "type": "ARRAY",
                "description": "A list of actionable tasks extracted from the text.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {
                            "type": "STRING",
                            "description": "A short, clear title for the task."
                        },
                        "description": {
                            "type": "STRING",
                            "description": "A detailed description of the task, if available in the text."
                        }
                    },
                    "required": ["title", "description"]
                }
            }
        },
        "required": ["projectName", "tasks"]
    })
}

/// Build the board for a smart-split answer: every task becomes a card in
/// "To Do", followed by empty "In Progress" and "Done" columns.
pub fn smart_split_project(response: &SmartSplitResponse, now_ms: i64) -> Project {
    let cards = response
        .tasks
        .iter()
        .map(|task| Card {
            id: new_id(),
            title: task.title.clone(),
            description: task.description.clone(),
            last_modified: now_ms,
        })
        .collect();

    let mut todo = Column::new("To Do");
    todo.cards = cards;

    Project {
        id: new_id(),
        name: response.project_name.clone(),
        category_id: None,
        data: ProjectData::Board(vec![todo, Column::new("In Progress"), Column::new("Done")]),
        last_modified: now_ms,
        view_mode: Some(ViewMode::List),
    }
}

/// Text to enhance for a card: its description, or the title when the
/// description is blank.
pub fn card_enhance_input(card: &Card) -> &str {
    if card.description.trim().is_empty() {
        &card.title
    } else {
        &card.description
    }
}
