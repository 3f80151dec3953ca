use std::{sync::OnceLock, time::Duration};

use reqwest::Client;

/// Shared HTTP client for completion calls
///
/// The per-call timeout comes from `script.request_timeout` and is set on
/// each request.
pub fn http_client() -> Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            Client::builder()
                .pool_idle_timeout(Some(Duration::from_secs(30)))
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "falling back to default HTTP client");
                    Client::new()
                })
        })
        .clone()
}
