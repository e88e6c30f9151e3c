use super::picker::mime_for;
use super::types::{ProgressFn, SelectedFile, UploadReceipt};
use crate::config::Config;
use crate::error::UploadError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, StatusCode};
use tracing::debug;

/// Sends one file to the remote endpoint.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(
        &self,
        file: &SelectedFile,
        progress: ProgressFn,
    ) -> Result<UploadReceipt, UploadError>;
}

/// Multipart POST of each file under a single form field.
#[derive(Clone)]
pub struct HttpUploader {
    client: Client,
    endpoint: String,
    field_name: String,
    chunk_size: usize,
}

impl HttpUploader {
    pub fn new(config: &Config) -> Result<Self, UploadError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
            field_name: config.field_name.clone(),
            chunk_size: config.chunk_size.max(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload(
        &self,
        file: &SelectedFile,
        progress: ProgressFn,
    ) -> Result<UploadReceipt, UploadError> {
        let content = file.payload.read().await?;
        let total = content.len() as u64;

        let body = progress_body(content, self.chunk_size, progress);
        let part = Part::stream_with_length(body, total)
            .file_name(file.name.clone())
            .mime_str(mime_for(&file.name))?;
        let form = Form::new().part(self.field_name.clone(), part);

        debug!(file = %file.name, bytes = total, endpoint = %self.endpoint, "Sending upload request");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(UploadError::Rejected(status));
        }

        let body = response.text().await?;
        serde_json::from_str::<UploadReceipt>(&body)
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))
    }
}

/// Streams `content` in chunks, reporting the running byte count as each
/// chunk is handed to the connection.
fn progress_body(content: Bytes, chunk_size: usize, progress: ProgressFn) -> Body {
    let total = content.len() as u64;
    let chunks: Vec<Bytes> = (0..content.len())
        .step_by(chunk_size)
        .map(|start| content.slice(start..(start + chunk_size).min(content.len())))
        .collect();

    let mut sent = 0u64;
    let chunks = stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        progress(sent, total);
        Ok::<_, std::io::Error>(chunk)
    });

    Body::wrap_stream(chunks)
}
