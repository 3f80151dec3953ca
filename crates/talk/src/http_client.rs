use std::{sync::OnceLock, time::Duration};

use reqwest::Client;

/// Shared HTTP client so talk submissions and status polls reuse connections
///
/// Per-call timeouts are set on each request; the client only bounds how
/// long idle connections are kept.
pub fn http_client() -> Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            Client::builder()
                .pool_idle_timeout(Some(Duration::from_secs(30)))
                .tcp_keepalive(Some(Duration::from_secs(60)))
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "falling back to default HTTP client");
                    Client::new()
                })
        })
        .clone()
}
