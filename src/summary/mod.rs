//! Free-text student summaries produced by a local text-generation service.
//!
//! The Ollama-backed client posts a prompt to `/api/generate` and consumes the streamed,
//! newline-delimited response as it arrives, concatenating every text fragment until the
//! service signals completion or closes the stream.

pub mod stream;

use crate::config::get_config;
use crate::store::Student;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use stream::{ChunkDecoder, DecodeState};
use thiserror::Error;

/// Errors surfaced while generating a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The service could not be reached or the connection failed mid-response.
    #[error("Summary service unavailable: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("Summary service returned {status}: {body}")]
    Protocol {
        /// HTTP status returned by the service.
        status: StatusCode,
        /// Response body, kept for diagnostics.
        body: String,
    },
    /// A streamed chunk was not valid JSON.
    #[error("Malformed summary stream: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Interface implemented by summary providers.
#[async_trait]
pub trait SummaryClient: Send + Sync {
    /// Produce a one-paragraph summary for the given student.
    async fn summarize(&self, student: &Student) -> Result<String, SummaryError>;
}

/// Build the generation prompt for a student.
pub fn build_prompt(student: &Student) -> String {
    format!(
        "Provide some made up information about the student with ID {}. The student's name is {}, they are {} years old, and their email is {}.Summarize the above given details in a paragraph.",
        student.id, student.name, student.age, student.email
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Summary client backed by the Ollama `/api/generate` streaming endpoint.
pub struct OllamaSummaryClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaSummaryClient {
    /// Construct a client for the service at `base_url` using `model` for every request.
    ///
    /// No request timeout is applied; a stalled service blocks the caller until the
    /// connection fails.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, SummaryError> {
        let http = Client::builder()
            .user_agent("student-roster/summary")
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    /// Construct a client from the loaded configuration.
    pub fn from_config() -> Result<Self, SummaryError> {
        let config = get_config();
        Self::new(config.ollama_url.clone(), config.summary_model.clone())
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SummaryClient for OllamaSummaryClient {
    async fn summarize(&self, student: &Student) -> Result<String, SummaryError> {
        let prompt = build_prompt(student);
        let payload = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
        };

        tracing::debug!(
            id = student.id,
            model = %self.model,
            endpoint = %self.endpoint(),
            "Requesting summary"
        );
        let response = self.http.post(self.endpoint()).json(&payload).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::Protocol { status, body });
        }

        let mut decoder = ChunkDecoder::new();
        let mut body = response.bytes_stream();
        while let Some(bytes) = body.next().await {
            if decoder.feed(&bytes?)? == DecodeState::Done {
                break;
            }
        }
        let summary = decoder.finish()?;

        tracing::debug!(id = student.id, summary = %summary, "Generated summary");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn student() -> Student {
        Student {
            id: 17,
            name: "Ada".into(),
            age: 36,
            email: "ada@example.org".into(),
        }
    }

    fn client_for(server: &MockServer) -> OllamaSummaryClient {
        OllamaSummaryClient::new(server.base_url(), "llama3.2").expect("client")
    }

    #[test]
    fn prompt_embeds_every_field() {
        let prompt = build_prompt(&student());
        assert_eq!(
            prompt,
            "Provide some made up information about the student with ID 17. The student's name is Ada, they are 36 years old, and their email is ada@example.org.Summarize the above given details in a paragraph."
        );
    }

    #[tokio::test]
    async fn streams_fragments_until_done() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body(json!({
                        "model": "llama3.2",
                        "prompt": build_prompt(&student()),
                    }));
                then.status(200)
                    .header("content-type", "application/x-ndjson")
                    .body(
                        "{\"model\":\"llama3.2\",\"response\":\"Hello \",\"done\":false}\n\
                         {\"model\":\"llama3.2\",\"response\":\"world\",\"done\":false}\n\
                         {\"model\":\"llama3.2\",\"response\":\"\",\"done\":true}\n",
                    );
            })
            .await;

        let summary = client_for(&server)
            .summarize(&student())
            .await
            .expect("summary");

        mock.assert_async().await;
        assert_eq!(summary, "Hello world");
    }

    #[tokio::test]
    async fn stream_end_without_done_returns_fragments() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200)
                    .body("{\"response\":\"cut \"}\n{\"response\":\"short\"}\n");
            })
            .await;

        let summary = client_for(&server)
            .summarize(&student())
            .await
            .expect("summary");

        assert_eq!(summary, "cut short");
    }

    #[tokio::test]
    async fn error_status_is_protocol_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(404)
                    .body("{\"response\":\"ignored\",\"done\":true}\n");
            })
            .await;

        let error = client_for(&server)
            .summarize(&student())
            .await
            .expect_err("error status");

        assert!(
            matches!(&error, SummaryError::Protocol { status, .. } if *status == StatusCode::NOT_FOUND),
            "unexpected error: {error:?}"
        );
    }

    #[tokio::test]
    async fn malformed_chunk_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200)
                    .body("{\"response\":\"fine\"}\n{oops}\n{\"done\":true}\n");
            })
            .await;

        let error = client_for(&server)
            .summarize(&student())
            .await
            .expect_err("decode error");

        assert!(matches!(error, SummaryError::Decode(_)), "unexpected error: {error:?}");
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let client =
            OllamaSummaryClient::new(format!("http://127.0.0.1:{port}"), "llama3.2").expect("client");

        let error = client
            .summarize(&student())
            .await
            .expect_err("transport error");

        assert!(matches!(error, SummaryError::Transport(_)), "unexpected error: {error:?}");
    }
}
