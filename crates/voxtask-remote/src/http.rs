//! Shared HTTP client construction and response handling.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use voxtask_core::{Result, VoxtaskError};

/// Build a client with a per-request timeout.
pub fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| VoxtaskError::Remote(format!("Failed to build HTTP client: {e}")))
}

/// Status and body of a finished response.
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Read a response to completion.
pub async fn read_response(response: Response) -> std::result::Result<RawResponse, reqwest::Error> {
    let status = response.status();
    let body = response.text().await?;
    Ok(RawResponse { status, body })
}

/// Join a base URL and a path without doubling slashes.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
