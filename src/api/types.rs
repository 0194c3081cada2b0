//! Wire types for the document store API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// AI analysis lifecycle of a stored document
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// No analysis has ever been requested
    #[default]
    NotStarted,
    /// Queued on the server
    Pending,
    /// The model is working on it
    Processing,
    /// Analysis text is available
    Completed,
    /// The last attempt failed
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// A stored PDF as the server describes it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    pub filesize: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub analysis_status: AnalysisStatus,
    #[serde(default)]
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// `GET {base}/` success body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub count: usize,
}

/// `POST {base}/upload/` 201 body
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub id: i64,
    pub filename: String,
    pub filesize: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub message: String,
}

/// `DELETE {base}/{id}/delete/` 200 body; the payload may be empty
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub message: String,
}

/// `POST {base}/{id}/analyze/` 200 body
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub message: String,
    pub analysis: String,
    #[serde(default)]
    pub status: AnalysisStatus,
    #[serde(default)]
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// `GET {base}/{id}/analysis/` 200 body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: Option<String>,
    #[serde(default)]
    pub status: AnalysisStatus,
    #[serde(default)]
    pub analyzed_at: Option<DateTime<Utc>>,
}
