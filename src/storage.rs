use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use std::time::Duration;

use crate::logger::{debug, Component};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedMedia {
    #[serde(rename = "file_url")]
    pub url: String,
}

/// Blob storage collaborator. The pipeline hands it raw audio bytes and
/// gets back a URL it can pass to the transcription service.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>)
        -> Result<UploadedMedia, StorageError>;
}

/// Uploads audio as multipart/form-data to the configured endpoint and
/// expects a `{"file_url": ...}` JSON reply.
pub struct HttpMediaStore {
    client: reqwest::Client,
    upload_url: String,
}

impl HttpMediaStore {
    pub fn new(upload_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .user_agent(format!("Lectern/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            upload_url: upload_url.to_string(),
        }
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedMedia, StorageError> {
        debug(
            Component::Storage,
            &format!("Uploading {} ({} bytes)", file_name, bytes.len()),
        );

        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected(format!(
                "Storage returned {}: {}",
                status, body
            )));
        }

        response
            .json::<UploadedMedia>()
            .await
            .map_err(|e| StorageError::MalformedResponse(e.to_string()))
    }
}
