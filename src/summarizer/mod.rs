use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{config::SummarizerConfig, models::Note};

pub const NO_NOTES_SUMMARY: &str = "No messages today.";

const SYSTEM_PROMPT: &str = "You are a neutral, non-judgmental summarizer of personal journal \
                             entries. Describe the themes and patterns that appear in the \
                             entries. Do not offer opinions, praise, criticism or advice.";

#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    #[error("no API key configured for the summarization service")]
    MissingApiKey,

    #[error("summarization request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("summarization service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("summarization service returned a malformed response: {0}")]
    Malformed(String),

    #[error("summarization service returned an empty response")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Gateway to an OpenAI-compatible chat completions endpoint.
pub struct Summarizer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl Summarizer {
    pub fn new(config: &SummarizerConfig, api_key: Option<String>) -> Result<Self, SummarizerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
        })
    }

    pub async fn summarize(&self, notes: &[Note]) -> Result<String, SummarizerError> {
        if notes.is_empty() {
            return Ok(NO_NOTES_SUMMARY.to_string());
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SummarizerError::MissingApiKey)?;

        let entries = format_entries(notes);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &entries,
                },
            ],
        };

        tracing::info!(
            "Requesting summary of {} notes from {} using model {}",
            notes.len(),
            self.endpoint,
            self.model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::Status { status, body });
        }

        let body = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| SummarizerError::Malformed(e.to_string()))?;

        let summary = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(SummarizerError::EmptyResponse)?;

        tracing::debug!("Received summary of {} characters", summary.len());

        Ok(summary)
    }
}

fn format_entries(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|note| format!("- {}", note.content))
        .collect::<Vec<_>>()
        .join("\n")
}
