/// Gemini client behind the `/ai` proxy and the smart-split / enhance flows.
///
/// One request per call: no retry, no cancellation. The API key is read from
/// the environment once at startup; without it every call fails with
/// `NotConfigured`.
use std::time::Duration;

use axum::http::StatusCode;
use clarity_core::proxy::{
    self, EnhanceOption, EnhanceTextResponse, ProxyRequest, ProxyRequestError, SmartSplitResponse,
    MSG_INVALID_TYPE, MSG_METHOD_NOT_ALLOWED, MSG_NOT_CONFIGURED, MSG_UPSTREAM_FAILED,
};
use serde::Deserialize;
use serde_json::json;

use crate::config::AiConfig;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("{}", MSG_METHOD_NOT_ALLOWED)]
    MethodNotAllowed,

    #[error("{}", MSG_NOT_CONFIGURED)]
    NotConfigured,

    #[error("{}", MSG_INVALID_TYPE)]
    InvalidType,

    #[error("{} Details: {}", MSG_UPSTREAM_FAILED, .0)]
    Upstream(String),
}

impl AiError {
    pub fn status(&self) -> StatusCode {
        match self {
            AiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AiError::InvalidType => StatusCode::BAD_REQUEST,
            AiError::NotConfigured | AiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProxyRequestError> for AiError {
    fn from(e: ProxyRequestError) -> Self {
        match e {
            ProxyRequestError::InvalidType(_) => AiError::InvalidType,
            ProxyRequestError::Malformed(e) => AiError::Upstream(e.to_string()),
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        AiError::Upstream(e.to_string())
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenated text of the first candidate.
fn response_text(response: GenerateContentResponse) -> Result<String, AiError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(AiError::Upstream("The model returned no text.".to_string()));
    }
    Ok(text)
}

/// Pull a readable message out of an upstream error body.
fn upstream_error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

fn enhance_config() -> serde_json::Value {
    json!({ "thinkingConfig": { "thinkingBudget": 0 } })
}

fn project_config() -> serde_json::Value {
    json!({
        "responseMimeType": "application/json",
        "responseSchema": proxy::smart_split_schema(),
    })
}

fn parse_project(raw: &str) -> Result<SmartSplitResponse, AiError> {
    serde_json::from_str(raw.trim())
        .map_err(|e| AiError::Upstream(format!("Invalid project JSON: {}", e)))
}

pub struct AiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl AiClient {
    pub fn new(config: &AiConfig, api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                log::warn!(target: "clarity.ai", "Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });
        Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build from config, taking the key from `config.api_key_env`.
    pub fn from_env(config: &AiConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            log::warn!(
                target: "clarity.ai",
                "{} is not set; AI features are disabled",
                config.api_key_env
            );
        }
        Self::new(config, api_key)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run a proxy request and return the JSON body the proxy answers with.
    pub async fn handle(&self, request: &ProxyRequest) -> Result<serde_json::Value, AiError> {
        log::info!(target: "clarity.ai", "Proxy request: {}", request.kind());
        let prompt = request.prompt();
        match request {
            ProxyRequest::EnhanceText(_) => {
                let result = self.generate_content(&prompt, enhance_config()).await?;
                Ok(json!(EnhanceTextResponse { result }))
            }
            ProxyRequest::GenerateProject(_) => {
                let raw = self.generate_content(&prompt, project_config()).await?;
                Ok(json!(parse_project(&raw)?))
            }
        }
    }

    pub async fn enhance_text(&self, option: EnhanceOption, text: &str) -> Result<String, AiError> {
        self.generate_content(&proxy::enhance_prompt(option, text), enhance_config()).await
    }

    pub async fn generate_project(&self, text: &str) -> Result<SmartSplitResponse, AiError> {
        let raw = self
            .generate_content(&proxy::generate_project_prompt(text), project_config())
            .await?;
        parse_project(&raw)
    }

    async fn generate_content(
        &self,
        prompt: &str,
        generation_config: serde_json::Value,
    ) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::NotConfigured)?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": generation_config,
        });

        log::debug!(target: "clarity.ai", "POST {} ({} prompt chars)", url, prompt.chars().count());
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AiError::Upstream(upstream_error_message(status, &text)));
        }
        response_text(resp.json().await?)
    }
}
