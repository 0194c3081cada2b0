//! Client configuration
//!
//! Defaults match the document store's dev deployment; everything can be
//! overridden through `MEDIVAULT_*` environment variables (a `.env` file is
//! honored when present).

use std::path::PathBuf;
use std::time::Duration;

/// Maximum accepted upload size (10 MB)
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Configuration for the document store client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the documents API, without a trailing slash
    /// (e.g. `http://localhost:8000/api/documents`)
    pub base_url: String,
    /// Deadline for list, delete, download and get-analysis calls
    pub default_timeout: Duration,
    /// Deadline for upload and analyze calls
    pub long_timeout: Duration,
    /// Deadline for the health probe
    pub health_timeout: Duration,
    /// Upload size ceiling in bytes
    pub max_file_size: u64,
    /// Total attempts for retried reads (first try included)
    pub retry_attempts: u32,
    /// Base interval for retry backoff
    pub retry_base_delay: Duration,
    /// Preview load watchdog
    pub watchdog_timeout: Duration,
    /// Destination for downloaded files; platform Downloads dir when unset
    pub download_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/documents".to_string(),
            default_timeout: Duration::from_secs(30),
            long_timeout: Duration::from_secs(120),
            health_timeout: Duration::from_secs(5),
            max_file_size: MAX_FILE_SIZE,
            retry_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
            watchdog_timeout: Duration::from_secs(15),
            download_dir: None,
        }
    }
}

impl ClientConfig {
    /// Build a configuration from the environment.
    ///
    /// Loads `.env` first (current dir, then parent) so `MEDIVAULT_*`
    /// variables can live next to the project during development.
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_path("../.env");
        }

        let mut config = Self::default();

        if let Ok(url) = std::env::var("MEDIVAULT_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = env_u64("MEDIVAULT_TIMEOUT_SECS") {
            config.default_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("MEDIVAULT_LONG_TIMEOUT_SECS") {
            config.long_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = env_u64("MEDIVAULT_RETRY_ATTEMPTS") {
            config.retry_attempts = attempts.max(1) as u32;
        }
        if let Some(ms) = env_u64("MEDIVAULT_RETRY_BASE_MS") {
            config.retry_base_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = env_u64("MEDIVAULT_WATCHDOG_SECS") {
            config.watchdog_timeout = Duration::from_secs(secs);
        }
        if let Ok(dir) = std::env::var("MEDIVAULT_DOWNLOAD_DIR") {
            config.download_dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// Directory downloads are persisted into
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(std::env::temp_dir)
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
