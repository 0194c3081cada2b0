//! Async driver for document operations.
//!
//! Glues the gateway, the per-id locks, the collection store and the
//! collaborator seams together: reads go through the retry policy,
//! mutations acquire the id's lock first and roll back to `Idle` on any
//! failure, leaving the document visible and actionable.

use crate::api::{AnalysisResponse, ApiError, Document, DocumentsClient};
use crate::config::ClientConfig;
use crate::documents::state::{Op, OperationLocks};
use crate::documents::store::{DocumentStore, FetchApplied};
use crate::documents::{ItemState, OpOutcome};
use crate::notify::{CollectionEvents, Notifier};
use crate::retry::RetryPolicy;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Orchestrates every operation the list screen can trigger
pub struct DocumentService {
    client: DocumentsClient,
    locks: OperationLocks,
    store: Mutex<DocumentStore>,
    retry: RetryPolicy,
    notifier: Arc<dyn Notifier>,
    events: Arc<dyn CollectionEvents>,
    download_dir: PathBuf,
}

impl DocumentService {
    pub fn new(
        config: &ClientConfig,
        notifier: Arc<dyn Notifier>,
        events: Arc<dyn CollectionEvents>,
    ) -> Self {
        Self {
            client: DocumentsClient::new(config),
            locks: OperationLocks::new(),
            store: Mutex::new(DocumentStore::new()),
            retry: RetryPolicy::new(config.retry_attempts, config.retry_base_delay),
            notifier,
            events,
            download_dir: config.resolved_download_dir(),
        }
    }

    /// Snapshot of the cached collection
    pub async fn documents(&self) -> Vec<Document> {
        self.store.lock().await.documents().to_vec()
    }

    /// Error recorded by the most recent failed fetch, if any
    pub async fn last_error(&self) -> Option<String> {
        self.store.lock().await.last_error().map(str::to_string)
    }

    /// Visible state of one document's controls
    pub fn item_state(&self, id: i64) -> ItemState {
        self.locks.state(id)
    }

    /// Refetch the collection under the retry policy.
    ///
    /// Returns true when the collection was replaced. A failure keeps the
    /// previous collection, records the error and notifies; a response
    /// that lost to a newer fetch is dropped.
    pub async fn refresh(&self) -> bool {
        let generation = self.store.lock().await.begin_fetch();
        let outcome = self.retry.run(|| self.client.list_documents()).await;
        let error_text = outcome.as_ref().err().map(|e| e.to_string());

        match self.store.lock().await.apply_fetch(generation, outcome) {
            FetchApplied::Replaced => true,
            FetchApplied::Stale => false,
            FetchApplied::FailedKeptPrevious => {
                self.notifier.error(&format!(
                    "Failed to load documents: {}",
                    error_text.unwrap_or_default()
                ));
                false
            }
        }
    }

    /// Ask for delete confirmation; false when the id is busy
    pub fn request_delete(&self, id: i64) -> bool {
        self.locks.request_delete(id)
    }

    /// Back out of a pending confirmation; never touches the network
    pub fn cancel_delete(&self, id: i64) -> bool {
        self.locks.cancel_delete(id)
    }

    /// Run a confirmed delete. On success the document leaves the
    /// collection and the deletion collaborator fires exactly once.
    pub async fn confirm_delete(&self, id: i64) -> OpOutcome {
        let filename = self.filename_of(id).await;
        let Some(_guard) = self.locks.begin(id, Op::Delete) else {
            return OpOutcome::Skipped;
        };

        match self.client.delete_document(id).await {
            Ok(response) => {
                self.store.lock().await.remove(id);
                self.events.document_deleted(id);
                let message = if response.message.is_empty() {
                    format!("{} deleted", filename)
                } else {
                    response.message
                };
                self.notifier.success(&message);
                OpOutcome::Completed
            }
            Err(e) => {
                self.report_failure(Op::Delete, &filename, &e);
                OpOutcome::Failed
            }
        }
    }

    /// Download the document and persist it locally under its exact
    /// original filename.
    pub async fn download(&self, id: i64) -> OpOutcome {
        let filename = self.filename_of(id).await;
        let Some(_guard) = self.locks.begin(id, Op::Download) else {
            return OpOutcome::Skipped;
        };

        let bytes = match self.client.download(id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.report_failure(Op::Download, &filename, &e);
                return OpOutcome::Failed;
            }
        };

        match save_locally(&self.download_dir, &filename, &bytes).await {
            Ok(path) => {
                info!(id, path = %path.display(), "document saved locally");
                self.notifier.success(&format!("{} downloaded", filename));
                OpOutcome::Completed
            }
            Err(detail) => {
                self.notifier
                    .error(&format!("Failed to download {}: {}", filename, detail));
                OpOutcome::Failed
            }
        }
    }

    /// Run AI analysis; a success folds the returned status and timestamp
    /// into the cached document.
    pub async fn analyze(&self, id: i64) -> OpOutcome {
        let filename = self.filename_of(id).await;
        let Some(_guard) = self.locks.begin(id, Op::Analyze) else {
            return OpOutcome::Skipped;
        };

        match self.client.analyze(id).await {
            Ok(response) => {
                self.store
                    .lock()
                    .await
                    .set_analysis(id, response.status, response.analyzed_at);
                let message = if response.message.is_empty() {
                    format!("{} analyzed", filename)
                } else {
                    response.message
                };
                self.notifier.success(&message);
                OpOutcome::Completed
            }
            Err(e) => {
                self.report_failure(Op::Analyze, &filename, &e);
                OpOutcome::Failed
            }
        }
    }

    /// Fetch a stored analysis result; a plain read with no lock involved
    pub async fn fetch_analysis(&self, id: i64) -> Result<AnalysisResponse, ApiError> {
        self.client.get_analysis(id).await
    }

    async fn filename_of(&self, id: i64) -> String {
        self.store
            .lock()
            .await
            .get(id)
            .map(|d| d.filename.clone())
            .unwrap_or_else(|| format!("document {}", id))
    }

    fn report_failure(&self, op: Op, filename: &str, err: &ApiError) {
        debug!(op = op.as_str(), filename, error = %err, "operation failed, item back to idle");
        self.notifier.error(&format!(
            "Failed to {} {}: {}",
            op.as_str(),
            filename,
            err
        ));
    }
}

/// Write the payload through a transient named handle, then persist it
/// under the exact original filename. The handle is released either way.
async fn save_locally(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, String> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| format!("could not create {}: {}", dir.display(), e))?;

    let target = dir.join(filename);
    let mut handle = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| format!("could not create transient file: {e}"))?;
    handle
        .write_all(bytes)
        .map_err(|e| format!("could not write payload: {e}"))?;
    handle
        .persist(&target)
        .map_err(|e| format!("could not save as {}: {}", target.display(), e))?;

    Ok(target)
}
