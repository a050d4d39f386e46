use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::llm::{LlmEngine, LlmError, LlmRequest};
use crate::logger::{debug, Component};

/// HTTP client for the remote transcription/LLM service. Sends the
/// request as JSON and expects the structured JSON payload back.
pub struct RemoteLlmClient {
    client: Client,
    invoke_url: String,
}

impl RemoteLlmClient {
    pub fn new(invoke_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("Lectern/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            invoke_url: invoke_url.to_string(),
        }
    }
}

#[async_trait]
impl LlmEngine for RemoteLlmClient {
    async fn invoke(&self, request: LlmRequest) -> Result<Value, LlmError> {
        debug(
            Component::Llm,
            &format!("Invoking remote service at {}", self.invoke_url),
        );

        let response = self
            .client
            .post(&self.invoke_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Service(format!(
                "Service returned {}: {}",
                status, body
            )));
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        Ok(payload)
    }
}
