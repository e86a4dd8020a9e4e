//! Uploadcare direct-upload storage.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::collaborators::MetadataStorage;
use crate::config::UploadcareConfig;
use crate::error::StorageError;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: String,
}

/// Stores files through the Uploadcare base upload API and returns their CDN URL.
pub struct UploadcareStorage {
    config: UploadcareConfig,
    http: reqwest::Client,
}

impl UploadcareStorage {
    pub fn new(config: UploadcareConfig) -> Result<Self, StorageError> {
        if config.public_key.trim().is_empty() {
            return Err(StorageError::Rejected(
                "uploadcare.public_key is not configured".into(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()?;

        Ok(Self { config, http })
    }

    /// CDN URL of an uploaded file.
    pub fn cdn_url(&self, file_id: &str) -> String {
        format!("{}/{}/", self.config.cdn_base.trim_end_matches('/'), file_id)
    }
}

#[async_trait]
impl MetadataStorage for UploadcareStorage {
    async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let size = bytes.len();
        let file = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;

        let form = Form::new()
            .text("UPLOADCARE_PUB_KEY", self.config.public_key.clone())
            .text("UPLOADCARE_STORE", self.config.store.clone())
            .part("file", file);

        debug!(%file_name, size, url = %self.config.upload_url, "uploading to uploadcare");

        let response = self
            .http
            .post(&self.config.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected(format!("{status}: {}", body.trim())));
        }

        let uploaded = parse_upload_response(&response.text().await?, file_name)?;
        Ok(self.cdn_url(&uploaded))
    }
}

fn parse_upload_response(body: &str, file_name: &str) -> Result<String, StorageError> {
    let parsed: UploadResponse = serde_json::from_str(body)
        .map_err(|e| StorageError::MalformedResponse(format!("{e}: {}", body.trim())))?;

    if parsed.file.is_empty() {
        return Err(StorageError::MalformedResponse(format!(
            "no file id returned for {file_name}"
        )));
    }
    Ok(parsed.file)
}
