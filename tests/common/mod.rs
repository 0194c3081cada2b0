//! Shared helpers for the wiremock-backed integration tests.

#![allow(dead_code)]

use medivault::{ClientConfig, CollectionEvents, Notifier};
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use wiremock::MockServer;

/// Client configuration pointed at a mock store, with snappy retries
pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: format!("{}/api/documents", server.uri()),
        retry_base_delay: Duration::from_millis(1),
        ..Default::default()
    }
}

/// Server-shaped JSON for one document row
pub fn document_json(id: i64, filename: &str, filesize: u64) -> serde_json::Value {
    json!({
        "id": id,
        "filename": filename,
        "filesize": filesize,
        "created_at": "2026-01-15T10:30:00Z",
        "analysis_status": "not_started",
        "analyzed_at": null
    })
}

/// Server-shaped JSON for a list response
pub fn list_json(documents: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "count": documents.len(),
        "documents": documents
    })
}

/// Collects everything the orchestration layer reports
#[derive(Default)]
pub struct Recorder {
    pub successes: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<i64>>,
    pub refreshes: AtomicU32,
}

impl Recorder {
    pub fn success_messages(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn deleted_ids(&self) -> Vec<i64> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn refresh_count(&self) -> u32 {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl Notifier for Recorder {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

impl CollectionEvents for Recorder {
    fn document_deleted(&self, id: i64) {
        self.deleted.lock().unwrap().push(id);
    }

    fn refresh_requested(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}
