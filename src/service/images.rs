use anyhow::Context;
use serde::Deserialize;

use crate::constants::API_NAME;
use crate::error::AppError;

/// Listing photos: resized for the catalog grid.
pub const CAR_IMAGE_TRANSFORM: &str = "w-1280,q-auto,f-webp";
/// Avatars: small square crop.
pub const AVATAR_TRANSFORM: &str = "w-400,q-auto,f-webp";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "filePath")]
    file_path: String,
}

/// Client for the external image-hosting service (ImageKit-compatible REST
/// upload API). Bytes are forwarded straight from memory; nothing is spooled
/// to disk.
#[derive(Clone)]
pub struct ImageClient {
    http: reqwest::Client,
    upload_url: String,
    url_endpoint: String,
    private_key: String,
}

impl ImageClient {
    pub fn new(upload_url: String, url_endpoint: String, private_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            upload_url,
            url_endpoint,
            private_key,
        }
    }

    /// Uploads the image and returns the transformed delivery URL.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        folder: &str,
        transform: &str,
    ) -> Result<String, AppError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("fileName", file_name.to_string())
            .text("folder", folder.to_string());

        let response = self
            .http
            .post(&self.upload_url)
            .basic_auth(&self.private_key, Some(""))
            .multipart(form)
            .send()
            .await
            .context("image upload request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Internal(anyhow::anyhow!(
                "image service returned {}: {}",
                status,
                body
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .context("invalid image service response")?;

        tracing::info!("{} Uploaded image {}", API_NAME, uploaded.file_path);
        Ok(self.transformed_url(&uploaded.file_path, transform))
    }

    /// Delivery URL with the transformation segment ahead of the file path.
    pub fn transformed_url(&self, file_path: &str, transform: &str) -> String {
        let endpoint = self.url_endpoint.trim_end_matches('/');
        let path = file_path.trim_start_matches('/');
        format!("{endpoint}/tr:{transform}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ImageClient {
        ImageClient::new(
            "https://upload.example/api/v1/files/upload".to_string(),
            "https://ik.example.com/smartwheelz/".to_string(),
            "private_key".to_string(),
        )
    }

    #[test]
    fn transformed_url_inserts_the_transform_segment() {
        let url = client().transformed_url("/cars/abc123.jpg", CAR_IMAGE_TRANSFORM);
        assert_eq!(
            url,
            "https://ik.example.com/smartwheelz/tr:w-1280,q-auto,f-webp/cars/abc123.jpg"
        );
    }

    #[test]
    fn transformed_url_handles_missing_slashes() {
        let url = client().transformed_url("users/me.png", AVATAR_TRANSFORM);
        assert_eq!(
            url,
            "https://ik.example.com/smartwheelz/tr:w-400,q-auto,f-webp/users/me.png"
        );
    }
}
