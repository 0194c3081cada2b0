//! Client-side orchestration runtime for a remote PDF document store.
//!
//! Owns the full lifecycle of every user action against the store —
//! upload, list (with retry), delete (with confirmation), download and AI
//! analysis — plus the preview navigation state machine layered over a
//! displayed document. Rendering, persistence and the model itself live
//! behind collaborator seams; this crate only caches a view and drives
//! the workflows.

pub mod analysis;
pub mod api;
pub mod config;
pub mod documents;
mod http;
pub mod notify;
pub mod retry;
pub mod upload;
pub mod viewer;

pub use api::{
    AnalysisResponse, AnalysisStatus, AnalyzeResponse, ApiError, DeleteResponse, Document,
    DocumentsClient, ListResponse, UploadResponse,
};
pub use config::ClientConfig;
pub use documents::{
    DocumentService, DocumentStore, FetchApplied, ItemState, OpOutcome, OperationLocks,
};
pub use notify::{CollectionEvents, LogNotifier, Notifier};
pub use retry::RetryPolicy;
pub use upload::{UploadCandidate, UploadSession, UploadSource, ValidationError};
pub use viewer::{CloseReason, PdfViewer, ViewerError};

use tracing_subscriber::EnvFilter;

/// Initialize tracing with a `RUST_LOG` env filter.
///
/// Default: warn for most crates, info for this one. Use RUST_LOG=debug
/// for verbose per-operation logs.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,medivault=info")),
        )
        .init();
}
