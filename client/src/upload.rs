//! Image uploads to imgBB.

use std::sync::Arc;

use abitus_core::{FileUpload, ImgbbClient, UploadError};
use config::ConfigError;
use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::config::ImgbbSettings;
use crate::transport::Transport;

#[derive(Debug)]
pub struct ImageUploader<T> {
    client: ImgbbClient,
    transport: Arc<T>,
}

impl<T> Clone for ImageUploader<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> ImageUploader<T> {
    pub fn new(client: ImgbbClient, transport: Arc<T>) -> Self {
        Self { client, transport }
    }

    /// Fails when no API key is configured.
    pub fn from_settings(settings: &ImgbbSettings, transport: Arc<T>) -> Result<Self, ConfigError> {
        let api_key = settings.require_api_key()?;
        Ok(Self::new(
            ImgbbClient::new(&settings.upload_url, api_key),
            transport,
        ))
    }

    /// Upload one file and return the URL imgBB serves it from.
    pub async fn upload_image(&self, file: &FileUpload) -> Result<String, UploadError> {
        debug!(
            file_name = %file.file_name,
            mime_type = %file.mime_type,
            size = file.bytes.len(),
            "uploading image"
        );

        let response = match self.transport.execute(self.client.build_upload(file)).await {
            Ok(response) => response,
            Err(err) => {
                warn!(file_name = %file.file_name, error = %err, "image upload did not complete");
                return Err(UploadError::generic());
            }
        };

        let status = response.status;
        match self.client.parse_upload(response) {
            Ok(url) => {
                debug!(file_name = %file.file_name, %url, "image uploaded");
                Ok(url)
            }
            Err(err) => {
                warn!(file_name = %file.file_name, status, error = %err, "image upload rejected");
                Err(err)
            }
        }
    }

    /// Upload every file concurrently. Either all URLs come back, in input
    /// order, or the first failure is returned and the rest are dropped.
    pub async fn upload_multiple_images(&self, files: &[FileUpload]) -> Result<Vec<String>, UploadError> {
        debug!(count = files.len(), "uploading images");
        try_join_all(files.iter().map(|file| self.upload_image(file))).await
    }
}
