//! Operation Gateway
//!
//! Translates logical document intents into deadline-bound HTTP calls and
//! normalizes every outcome into [`ApiError`] or a typed success body. The
//! gateway performs no retries and mutates nothing; callers own state.

mod error;
mod types;

pub use error::{ApiError, ErrorBody};
pub use types::{
    AnalysisResponse, AnalysisStatus, AnalyzeResponse, DeleteResponse, Document, ListResponse,
    UploadResponse,
};

use crate::config::ClientConfig;
use crate::http;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// HTTP client for the document store API
#[derive(Clone)]
pub struct DocumentsClient {
    http: &'static Client,
    base_url: String,
    default_timeout: Duration,
    long_timeout: Duration,
    health_timeout: Duration,
}

impl DocumentsClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: http::api_client(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_timeout: config.default_timeout,
            long_timeout: config.long_timeout,
            health_timeout: config.health_timeout,
        }
    }

    /// Fetch the full document list
    pub async fn list_documents(&self) -> Result<ListResponse, ApiError> {
        let url = format!("{}/", self.base_url);
        debug!(%url, "fetching document list");
        let response = self.execute(self.http.get(&url), self.default_timeout).await?;
        let list: ListResponse = parse_success(response).await?;
        debug!(count = list.count, "document list fetched");
        Ok(list)
    }

    /// Upload a PDF as the multipart `file` field
    pub async fn upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        mime_type: Option<&str>,
    ) -> Result<UploadResponse, ApiError> {
        let url = format!("{}/upload/", self.base_url);
        let mut part = Part::bytes(bytes).file_name(filename.to_string());
        if let Some(mime) = mime_type {
            part = part
                .mime_str(mime)
                .map_err(|e| ApiError::Validation(format!("invalid MIME type '{mime}': {e}")))?;
        }
        let form = Form::new().part("file", part);

        let response = self
            .execute(self.http.post(&url).multipart(form), self.long_timeout)
            .await?;
        let uploaded: UploadResponse = parse_success(response).await?;
        info!(id = uploaded.id, filename = %uploaded.filename, "document uploaded");
        Ok(uploaded)
    }

    /// Fetch the raw PDF bytes for a document
    pub async fn download(&self, id: i64) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}/{}/download/", self.base_url, id);
        debug!(%url, "downloading document");
        let response = self.execute(self.http.get(&url), self.default_timeout).await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read download body: {e}")))?;
        Ok(bytes.to_vec())
    }

    /// Delete a document; an empty success payload is accepted
    pub async fn delete_document(&self, id: i64) -> Result<DeleteResponse, ApiError> {
        let url = format!("{}/{}/delete/", self.base_url, id);
        let response = self
            .execute(self.http.delete(&url), self.default_timeout)
            .await?;
        let deleted: DeleteResponse = parse_success(response).await?;
        info!(id, "document deleted on server");
        Ok(deleted)
    }

    /// Run AI analysis for a document and return the fresh result
    pub async fn analyze(&self, id: i64) -> Result<AnalyzeResponse, ApiError> {
        let url = format!("{}/{}/analyze/", self.base_url, id);
        info!(id, "requesting document analysis");
        let response = self.execute(self.http.post(&url), self.long_timeout).await?;
        parse_success(response).await
    }

    /// Fetch a previously stored analysis result
    pub async fn get_analysis(&self, id: i64) -> Result<AnalysisResponse, ApiError> {
        let url = format!("{}/{}/analysis/", self.base_url, id);
        let response = self.execute(self.http.get(&url), self.default_timeout).await?;
        parse_success(response).await
    }

    /// Probe the store's health endpoint
    pub async fn health(&self) -> Result<serde_json::Value, ApiError> {
        let url = format!("{}/health/", self.base_url);
        let response = self.execute(self.http.get(&url), self.health_timeout).await?;
        parse_success(response).await
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        deadline: Duration,
    ) -> Result<Response, ApiError> {
        request
            .timeout(deadline)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, deadline))
    }
}

/// Decode a response: non-success becomes a normalized [`ApiError`], an
/// empty success body decodes as `{}` so bodyless 200s still produce a
/// (default) result.
async fn parse_success<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(error_from_response(response).await);
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::Network(format!("failed to read response body: {e}")))?;
    let body: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };

    serde_json::from_slice(body)
        .map_err(|e| ApiError::Network(format!("failed to decode response body: {e}")))
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), "document API call failed");
    ApiError::from_error_body(status.as_u16(), status.canonical_reason(), &body)
}
