use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to journal server failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("journal server returned {status}: {message}")]
    Server {
        status: reqwest::StatusCode,
        message: String,
    },
}

#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Created {
    pub status: String,
    pub id: String,
}

#[derive(Debug, Serialize)]
struct CreateNote<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct Summary {
    summary: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the journal server's three operations.
#[derive(Clone)]
pub struct JournalApi {
    base_url: String,
    client: reqwest::Client,
}

impl JournalApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn list_notes(&self) -> Result<Vec<Note>, ClientError> {
        let response = self
            .client
            .get(format!("{}/messages", self.base_url))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn create_note(&self, content: &str) -> Result<Created, ClientError> {
        let response = self
            .client
            .post(format!("{}/message", self.base_url))
            .json(&CreateNote { content })
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn summarize_today(&self) -> Result<String, ClientError> {
        let response = self
            .client
            .get(format!("{}/summary/today", self.base_url))
            .send()
            .await?;
        let summary: Summary = check(response).await?.json().await?;
        Ok(summary.summary)
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body).map_or(body, |e| e.error);

    Err(ClientError::Server { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn list_notes_parses_records() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "b", "content": "later", "timestamp": "2026-10-16T10:00:00.000Z" },
                { "id": "a", "content": "earlier", "timestamp": "2026-10-16T09:00:00.000Z" }
            ])))
            .mount(&mock_server)
            .await;

        let notes = JournalApi::new(&mock_server.uri()).list_notes().await.unwrap();

        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].content, "later");
        assert!(notes[0].timestamp > notes[1].timestamp);
    }

    #[tokio::test]
    async fn create_note_posts_content() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/message"))
            .and(body_json(json!({ "content": "hello" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "id": "x1" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let created = JournalApi::new(&format!("{}/", mock_server.uri()))
            .create_note("hello")
            .await
            .unwrap();

        assert_eq!(created.status, "ok");
        assert_eq!(created.id, "x1");
    }

    #[tokio::test]
    async fn server_error_message_is_extracted() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/summary/today"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({ "error": "LLM summarization failed." })),
            )
            .mount(&mock_server)
            .await;

        let err = JournalApi::new(&mock_server.uri())
            .summarize_today()
            .await
            .unwrap_err();

        match err {
            ClientError::Server { status, message } => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "LLM summarization failed.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
