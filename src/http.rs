//! Shared HTTP Client Module
//!
//! Provides a global, lazy-initialized HTTP client with connection pooling.
//! Deadlines differ per operation, so the client itself carries no timeout;
//! each request sets its own.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Global HTTP client for document store API calls
///
/// - modest idle pool, the store is a single host
/// - 90s idle timeout to balance resource usage and performance
/// - TCP keepalive so long analyze calls keep their connection
pub static API_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .pool_max_idle_per_host(8)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .build()
        .expect("Failed to create document API HTTP client")
});

/// Get the global document API HTTP client
#[inline]
pub fn api_client() -> &'static Client {
    &API_CLIENT
}
