//! Upload validation and the upload session.
//!
//! Candidates are checked client-side before any network I/O; a candidate
//! that passes drives `Idle -> Uploading -> Idle` through the gateway. The
//! pending selection is consumed in both outcomes so the same file can be
//! picked again immediately.

use crate::api::DocumentsClient;
use crate::config::ClientConfig;
use crate::documents::OpOutcome;
use crate::notify::{CollectionEvents, Notifier};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

const PDF_MIME: &str = "application/pdf";

/// First violated upload rule, in check order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("only PDF files are accepted")]
    Extension,
    #[error("declared type '{0}' is not application/pdf")]
    MimeType(String),
    #[error("file is {0} bytes, above the 10MB limit")]
    TooLarge(u64),
}

/// Where the upload payload comes from
#[derive(Debug, Clone)]
pub enum UploadSource {
    Bytes(Vec<u8>),
    File(PathBuf),
}

/// A file the user picked for upload
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub filename: String,
    pub mime_type: Option<String>,
    pub size: u64,
    pub source: UploadSource,
}

impl UploadCandidate {
    /// In-memory candidate with an explicitly declared MIME type
    pub fn from_bytes(
        filename: impl Into<String>,
        mime_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            mime_type,
            size: bytes.len() as u64,
            source: UploadSource::Bytes(bytes),
        }
    }

    /// Candidate backed by a file on disk; size comes from metadata and
    /// the declared MIME type is guessed from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unnamed".to_string());
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string());

        Ok(Self {
            filename,
            mime_type,
            size: metadata.len(),
            source: UploadSource::File(path.to_path_buf()),
        })
    }

    /// Check the candidate against the upload rules; the first violated
    /// rule wins. Order: extension, declared MIME type, size.
    pub fn validate(&self, max_size: u64) -> Result<(), ValidationError> {
        if !self.filename.to_lowercase().ends_with(".pdf") {
            return Err(ValidationError::Extension);
        }
        if let Some(mime) = &self.mime_type {
            if mime != PDF_MIME {
                return Err(ValidationError::MimeType(mime.clone()));
            }
        }
        if self.size > max_size {
            return Err(ValidationError::TooLarge(self.size));
        }
        Ok(())
    }
}

/// Drives one upload at a time through validation and the gateway
pub struct UploadSession {
    client: DocumentsClient,
    notifier: Arc<dyn Notifier>,
    events: Arc<dyn CollectionEvents>,
    max_file_size: u64,
    uploading: AtomicBool,
}

impl UploadSession {
    pub fn new(
        config: &ClientConfig,
        notifier: Arc<dyn Notifier>,
        events: Arc<dyn CollectionEvents>,
    ) -> Self {
        Self {
            client: DocumentsClient::new(config),
            notifier,
            events,
            max_file_size: config.max_file_size,
            uploading: AtomicBool::new(false),
        }
    }

    /// Whether an upload is currently in flight
    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    /// Validate and upload a candidate.
    ///
    /// Validation failures and upload failures both surface through the
    /// notifier; a second call while one is in flight is refused without
    /// touching the network.
    pub async fn upload(&self, candidate: UploadCandidate) -> OpOutcome {
        if let Err(rule) = candidate.validate(self.max_file_size) {
            debug!(filename = %candidate.filename, %rule, "upload rejected before network");
            self.notifier.error(&rule.to_string());
            return OpOutcome::Skipped;
        }

        if self.uploading.swap(true, Ordering::SeqCst) {
            debug!(filename = %candidate.filename, "upload already in flight, ignoring");
            return OpOutcome::Skipped;
        }

        let outcome = self.run_upload(&candidate).await;
        self.uploading.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_upload(&self, candidate: &UploadCandidate) -> OpOutcome {
        let bytes = match &candidate.source {
            UploadSource::Bytes(bytes) => bytes.clone(),
            UploadSource::File(path) => match tokio::fs::read(path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.notifier.error(&format!(
                        "Failed to upload {}: {}",
                        candidate.filename, e
                    ));
                    return OpOutcome::Failed;
                }
            },
        };

        match self
            .client
            .upload(&candidate.filename, bytes, candidate.mime_type.as_deref())
            .await
        {
            Ok(response) => {
                info!(id = response.id, filename = %response.filename, "upload finished");
                let message = if response.message.is_empty() {
                    format!("{} uploaded", response.filename)
                } else {
                    response.message
                };
                self.notifier.success(&message);
                self.events.refresh_requested();
                OpOutcome::Completed
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Failed to upload {}: {}", candidate.filename, e));
                OpOutcome::Failed
            }
        }
    }
}
