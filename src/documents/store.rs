//! Client-side cache of the document list.
//!
//! The store is the single authority for what the list screen shows: it is
//! replaced wholesale by each successful fetch and trimmed optimistically
//! when a delete call has succeeded (never before). A failed fetch leaves
//! the previous collection untouched so the user keeps something to act on.

use crate::api::{AnalysisStatus, ApiError, Document, ListResponse};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Outcome of applying a finished fetch to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchApplied {
    /// Collection replaced with the response
    Replaced,
    /// Fetch failed; previous collection preserved, error recorded
    FailedKeptPrevious,
    /// A newer fetch was issued meanwhile; this outcome was discarded
    Stale,
}

/// Authoritative cached view of the server's document collection
#[derive(Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    last_error: Option<String>,
    /// Token of the most recently issued fetch; outcomes carrying an older
    /// token lost the race and are dropped.
    latest_fetch: u64,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new fetch and return its generation token
    pub fn begin_fetch(&mut self) -> u64 {
        self.latest_fetch += 1;
        self.latest_fetch
    }

    /// Fold a finished fetch back in. Stale generations are discarded so a
    /// slow response can never overwrite a fresher collection.
    pub fn apply_fetch(
        &mut self,
        generation: u64,
        outcome: Result<ListResponse, ApiError>,
    ) -> FetchApplied {
        if generation < self.latest_fetch {
            debug!(generation, latest = self.latest_fetch, "discarding stale list response");
            return FetchApplied::Stale;
        }

        match outcome {
            Ok(list) => {
                debug!(count = list.documents.len(), "collection replaced");
                self.documents = list.documents;
                self.last_error = None;
                FetchApplied::Replaced
            }
            Err(e) => {
                warn!(error = %e, "list fetch failed, keeping previous collection");
                self.last_error = Some(e.to_string());
                FetchApplied::FailedKeptPrevious
            }
        }
    }

    /// Remove a document after its delete call succeeded
    pub fn remove(&mut self, id: i64) -> Option<Document> {
        let index = self.documents.iter().position(|d| d.id == id)?;
        Some(self.documents.remove(index))
    }

    pub fn get(&self, id: i64) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Fold a fresh analysis outcome into the cached document
    pub fn set_analysis(
        &mut self,
        id: i64,
        status: AnalysisStatus,
        analyzed_at: Option<DateTime<Utc>>,
    ) -> bool {
        match self.documents.iter_mut().find(|d| d.id == id) {
            Some(doc) => {
                doc.analysis_status = status;
                doc.analyzed_at = analyzed_at;
                true
            }
            None => false,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Error from the most recent failed fetch, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
