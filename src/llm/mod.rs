pub mod client;
pub mod prompts;
pub mod responses;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Remote service error: {0}")]
    Service(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// One structured-output request against the remote service: a prompt,
/// optional media references the service should ingest, and the JSON
/// schema the response must match.
#[derive(Debug, Clone, Serialize)]
pub struct LlmRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_urls: Vec<String>,
    #[serde(rename = "response_json_schema", skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

impl LlmRequest {
    pub fn new(prompt: String) -> Self {
        Self {
            prompt,
            file_urls: Vec::new(),
            response_schema: None,
        }
    }
}

#[async_trait]
pub trait LlmEngine: Send + Sync {
    /// Invoke the service once. No retries: the caller decides what a
    /// failure means at its own stage.
    async fn invoke(&self, request: LlmRequest) -> Result<Value, LlmError>;
}

pub use client::RemoteLlmClient;
