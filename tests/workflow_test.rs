//! Driver-level workflow tests: the full upload -> list -> delete round
//! trip, download persistence, analysis folding and the per-id lock.

mod common;

use common::{document_json, list_json, test_config, Recorder};
use medivault::upload::{UploadCandidate, UploadSession};
use medivault::{
    AnalysisStatus, CollectionEvents, DocumentService, ItemState, Notifier, OpOutcome,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_with_recorder(
    config: &medivault::ClientConfig,
) -> (DocumentService, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let service = DocumentService::new(
        config,
        Arc::clone(&recorder) as Arc<dyn Notifier>,
        Arc::clone(&recorder) as Arc<dyn CollectionEvents>,
    );
    (service, recorder)
}

#[tokio::test]
async fn test_upload_list_delete_round_trip() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    Mock::given(method("POST"))
        .and(path("/api/documents/upload/"))
        .and(body_string_contains("report.pdf"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7,
            "filename": "report.pdf",
            "filesize": 2_000_000,
            "created_at": "2026-01-15T10:30:00Z",
            "message": "File uploaded successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_json(vec![document_json(7, "report.pdf", 2_000_000)])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/documents/7/delete/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Document deleted successfully"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_json(vec![])))
        .mount(&server)
        .await;

    let (service, recorder) = service_with_recorder(&config);
    let session = UploadSession::new(
        &config,
        Arc::clone(&recorder) as Arc<dyn Notifier>,
        Arc::clone(&recorder) as Arc<dyn CollectionEvents>,
    );

    // Upload signals the refresh collaborator
    let payload = vec![b'%'; 64];
    let outcome = session
        .upload(UploadCandidate::from_bytes(
            "report.pdf",
            Some("application/pdf".to_string()),
            payload,
        ))
        .await;
    assert_eq!(outcome, OpOutcome::Completed);
    assert_eq!(recorder.refresh_count(), 1);

    // The signaled refresh lands the uploaded document in the collection
    assert!(service.refresh().await);
    let documents = service.documents().await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, 7);
    assert_eq!(documents[0].filename, "report.pdf");

    // Confirmed delete removes it and fires the collaborator exactly once
    assert!(service.request_delete(7));
    assert_eq!(service.confirm_delete(7).await, OpOutcome::Completed);
    assert!(service.documents().await.is_empty());
    assert_eq!(recorder.deleted_ids(), vec![7]);
    assert_eq!(service.item_state(7), ItemState::Idle);

    // A follow-up fetch agrees the store is empty
    assert!(service.refresh().await);
    assert!(service.documents().await.is_empty());
}

#[tokio::test]
async fn test_download_round_trip_preserves_bytes_and_name() {
    let server = MockServer::start().await;
    let payload = b"%PDF-1.4 original payload".to_vec();

    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_json(vec![document_json(5, "scan 2026.pdf", 25)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/documents/5/download/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(payload.clone())
                .insert_header("Content-Type", "application/pdf"),
        )
        .mount(&server)
        .await;

    let downloads = tempfile::tempdir().unwrap();
    let mut config = test_config(&server);
    config.download_dir = Some(downloads.path().to_path_buf());

    let (service, recorder) = service_with_recorder(&config);
    assert!(service.refresh().await);

    assert_eq!(service.download(5).await, OpOutcome::Completed);

    // Saved under the exact original filename, bytes untouched
    let saved = downloads.path().join("scan 2026.pdf");
    assert_eq!(std::fs::read(&saved).unwrap(), payload);
    assert_eq!(service.item_state(5), ItemState::Idle);
    assert!(recorder.error_messages().is_empty());
}

#[tokio::test]
async fn test_delete_failure_preserves_document_and_reports() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_json(vec![document_json(3, "labs.pdf", 500)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/documents/3/delete/"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "Document not found"})),
        )
        .mount(&server)
        .await;

    let (service, recorder) = service_with_recorder(&test_config(&server));
    assert!(service.refresh().await);

    assert!(service.request_delete(3));
    assert_eq!(service.confirm_delete(3).await, OpOutcome::Failed);

    // Document untouched, item actionable again, nobody told it was deleted
    assert_eq!(service.documents().await.len(), 1);
    assert_eq!(service.item_state(3), ItemState::Idle);
    assert!(recorder.deleted_ids().is_empty());
    assert_eq!(
        recorder.error_messages(),
        vec!["Failed to delete labs.pdf: Document not found".to_string()]
    );
}

#[tokio::test]
async fn test_cancel_delete_issues_no_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_json(vec![document_json(8, "notes.pdf", 10)])),
        )
        .mount(&server)
        .await;
    // No DELETE mock mounted: any delete call would fail the test below

    let (service, _recorder) = service_with_recorder(&test_config(&server));
    assert!(service.refresh().await);

    assert!(service.request_delete(8));
    assert_eq!(service.item_state(8), ItemState::AwaitingDeleteConfirmation);
    assert!(service.cancel_delete(8));
    assert_eq!(service.item_state(8), ItemState::Idle);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.method.to_string() != "DELETE"));
}

#[tokio::test]
async fn test_busy_item_refuses_second_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_json(vec![document_json(2, "consult.pdf", 42)])),
        )
        .mount(&server)
        .await;

    let (service, _recorder) = service_with_recorder(&test_config(&server));
    assert!(service.refresh().await);

    // Pending confirmation blocks downloads and analyses for that id only
    assert!(service.request_delete(2));
    assert_eq!(service.download(2).await, OpOutcome::Skipped);
    assert_eq!(service.analyze(2).await, OpOutcome::Skipped);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "only the list fetch may hit the network");
}

#[tokio::test]
async fn test_analyze_success_updates_cached_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_json(vec![document_json(6, "mri.pdf", 900)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/documents/6/analyze/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Document analyzed successfully",
            "analysis": "**Summary**\n- MRI of the knee\n1. Follow up in 6 weeks",
            "status": "completed",
            "analyzed_at": "2026-02-01T08:00:00Z"
        })))
        .mount(&server)
        .await;

    let (service, recorder) = service_with_recorder(&test_config(&server));
    assert!(service.refresh().await);

    assert_eq!(service.analyze(6).await, OpOutcome::Completed);

    let documents = service.documents().await;
    assert_eq!(documents[0].analysis_status, AnalysisStatus::Completed);
    assert!(documents[0].analyzed_at.is_some());
    assert_eq!(
        recorder.success_messages(),
        vec!["Document analyzed successfully".to_string()]
    );
    assert_eq!(service.item_state(6), ItemState::Idle);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_json(vec![document_json(1, "first.pdf", 1)])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "db down"})))
        .mount(&server)
        .await;

    let (service, recorder) = service_with_recorder(&test_config(&server));
    assert!(service.refresh().await);
    assert_eq!(service.documents().await.len(), 1);

    // Exhausts its retries against the 500, then keeps what it had
    assert!(!service.refresh().await);
    assert_eq!(service.documents().await.len(), 1);
    assert_eq!(service.last_error().await.as_deref(), Some("db down"));
    assert!(recorder
        .error_messages()
        .iter()
        .any(|m| m.starts_with("Failed to load documents:")));
}

#[tokio::test]
async fn test_invalid_upload_never_reaches_network() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let recorder = Arc::new(Recorder::default());
    let session = UploadSession::new(
        &config,
        Arc::clone(&recorder) as Arc<dyn Notifier>,
        Arc::clone(&recorder) as Arc<dyn CollectionEvents>,
    );

    let outcome = session
        .upload(UploadCandidate::from_bytes(
            "notes.txt",
            Some("text/plain".to_string()),
            b"hello".to_vec(),
        ))
        .await;

    assert_eq!(outcome, OpOutcome::Skipped);
    assert_eq!(recorder.refresh_count(), 0);
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(
        recorder.error_messages(),
        vec!["only PDF files are accepted".to_string()]
    );
}
