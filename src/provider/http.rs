//! Shared HTTP client and status mapping.

use std::sync::OnceLock;

use crate::error::ParleyError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// No overall request timeout: run streams stay open for as long as the
/// remote agent keeps working.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> ParleyError {
    match status {
        401 | 403 => ParleyError::Authentication(body.to_string()),
        429 => ParleyError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => ParleyError::api(status, body),
    }
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}

/// Read the body of a failed response and turn it into an error.
pub async fn error_from_response(resp: reqwest::Response) -> ParleyError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    status_to_error(status, &body)
}
