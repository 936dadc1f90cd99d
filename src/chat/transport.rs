// ABOUTME: Outbound transport for chat requests — trait seam plus the reqwest-backed HTTP client.
// ABOUTME: Sends the question as multipart or JSON and decodes the {"response": ...} reply.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chat::attachment::PendingAttachment;

/// Everything the remote endpoint receives for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// The raw typed text, without any attachment annotation.
    pub message: String,
    pub attachment: Option<PendingAttachment>,
}

/// Why a request failed. Every variant is shown to the user the same way.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Parse(String),
    #[error("unsupported request: {0}")]
    Unsupported(&'static str),
}

/// How the request body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// `message` text field plus an optional `pdf` file part.
    Multipart,
    /// `{"message": ...}`; cannot carry an attachment.
    Json,
}

/// Expected success payload. Anything else is a parse failure.
#[derive(Debug, Deserialize)]
struct ChatReply {
    response: String,
}

#[derive(Debug, Serialize)]
struct JsonBody<'a> {
    message: &'a str,
}

/// Sends a chat request and yields the reply text.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: ChatRequest) -> Result<String, RequestError>;
}

/// HTTP transport that POSTs to a fixed endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    encoding: Encoding,
}

impl HttpTransport {
    /// Build a transport with one timeout applied to every request, whatever the encoding.
    pub fn new(endpoint: &str, timeout: Duration, encoding: Encoding) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            timeout,
            encoding,
        })
    }

    fn build(&self, request: ChatRequest) -> Result<reqwest::RequestBuilder, RequestError> {
        let builder = self.client.post(&self.endpoint);
        match self.encoding {
            Encoding::Json => {
                if request.attachment.is_some() {
                    return Err(RequestError::Unsupported(
                        "attachments require the multipart encoding",
                    ));
                }
                Ok(builder.json(&JsonBody {
                    message: &request.message,
                }))
            }
            Encoding::Multipart => {
                let mut form = reqwest::multipart::Form::new().text("message", request.message);
                if let Some(att) = request.attachment {
                    let part = reqwest::multipart::Part::bytes(att.bytes)
                        .file_name(att.name)
                        .mime_str(&att.mime)
                        .map_err(|e| RequestError::Transport(e.to_string()))?;
                    form = form.part("pdf", part);
                }
                Ok(builder.multipart(form))
            }
        }
    }

    fn classify(&self, err: reqwest::Error) -> RequestError {
        if err.is_timeout() {
            RequestError::Timeout(self.timeout)
        } else {
            RequestError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: ChatRequest) -> Result<String, RequestError> {
        let resp = self
            .build(request)?
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RequestError::Status(status.as_u16()));
        }

        let body = resp.text().await.map_err(|e| self.classify(e))?;
        parse_reply(&body)
    }
}

/// Decode the success payload, failing closed when `response` is absent or not a string.
pub fn parse_reply(body: &str) -> Result<String, RequestError> {
    serde_json::from_str::<ChatReply>(body)
        .map(|reply| reply.response)
        .map_err(|e| RequestError::Parse(e.to_string()))
}
