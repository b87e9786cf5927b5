//! Book cover upload

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::client::{ApiClient, ApiError, ApiResult};

#[derive(Debug, Default, Deserialize)]
struct UploadResponse {
    url: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct UploadsService {
    client: ApiClient,
}

impl UploadsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Upload an image and return its public URL
    pub async fn upload_cover(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> ApiResult<String> {
        let mut part = Part::bytes(bytes).file_name(file_name.to_string());
        if let Some(content_type) = content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| ApiError::Request(e.to_string()))?;
        }

        let form = Form::new()
            .part("file", part)
            .text("fileName", file_name.to_string());

        let response = self.client.upload("/api/imagekit/", form).await?;
        let status = response.status();
        let body: UploadResponse = response.json().await.unwrap_or_default();

        match body.url {
            Some(url) if status.is_success() => Ok(url),
            _ => {
                let reason = body
                    .error
                    .unwrap_or_else(|| format!("status {}", status));
                tracing::error!("Image upload failed: {}", reason);
                Err(ApiError::Upload(reason))
            }
        }
    }
}
